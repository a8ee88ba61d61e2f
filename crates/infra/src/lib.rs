//! Infrastructure layer: storage, external services, and the services that
//! orchestrate the domain crates over them.

pub mod catalog_service;
pub mod error;
pub mod external;
pub mod import_service;
pub mod repository;
pub mod store;


use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use vintrade_catalog::RetentionPolicy;

pub use catalog_service::{CatalogService, QuoteRequest};
pub use error::{ImportError, ServiceError};
pub use external::{ConversionError, PdfTableConverter, UploadGuard};
pub use import_service::{ImportRequest, ImportService};
pub use repository::{Repository, Snapshot, keys};
pub use store::{BlobStore, BlobWrite, FileBlobStore, InMemoryBlobStore, StoreError, Versioned};

/// Service wiring options.
#[derive(Debug, Clone, Default)]
pub struct ServiceOptions {
    pub pdf_converter: Option<PdfTableConverter>,
    /// Where uploaded PDFs are staged; defaults to the system temp dir.
    pub upload_dir: Option<PathBuf>,
    pub retention: RetentionPolicy,
}

/// Import and catalog services over one store, sharing one write lock.
#[derive(Debug, Clone)]
pub struct Services {
    pub imports: ImportService,
    pub catalog: CatalogService,
}

impl Services {
    pub fn new(store: Arc<dyn BlobStore>, options: ServiceOptions) -> Self {
        let repo = Repository::new(store);
        let write_lock = Arc::new(Mutex::new(()));
        let upload_dir = options
            .upload_dir
            .unwrap_or_else(|| std::env::temp_dir().join("vintrade-uploads"));

        Self {
            imports: ImportService::new(
                repo.clone(),
                write_lock.clone(),
                options.pdf_converter,
                upload_dir,
            ),
            catalog: CatalogService::new(repo, write_lock, options.retention),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBlobStore::new()), ServiceOptions::default())
    }
}
