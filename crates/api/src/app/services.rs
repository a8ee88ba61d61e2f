//! Store selection and service wiring.

use std::sync::Arc;

use tracing::info;

use vintrade_infra::{
    BlobStore, CatalogService, FileBlobStore, ImportService, InMemoryBlobStore, ServiceOptions,
    Services, StoreError,
};

use crate::config::ApiConfig;

/// Services shared by every handler.
#[derive(Debug, Clone)]
pub struct AppServices {
    inner: Services,
}

impl AppServices {
    pub fn new(inner: Services) -> Self {
        Self { inner }
    }

    pub fn imports(&self) -> &ImportService {
        &self.inner.imports
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }
}

/// File-backed store when a data directory is configured, in-memory otherwise.
pub fn build_services(config: &ApiConfig) -> Result<AppServices, StoreError> {
    let store: Arc<dyn BlobStore> = match &config.data_dir {
        Some(dir) => {
            info!(data_dir = %dir.display(), "using file-backed store");
            Arc::new(FileBlobStore::open(dir)?)
        }
        None => {
            info!("no data directory configured; using in-memory store");
            Arc::new(InMemoryBlobStore::new())
        }
    };

    let options = ServiceOptions {
        pdf_converter: config.pdf_converter.clone(),
        upload_dir: config.upload_dir.clone(),
        retention: config.retention,
    };
    Ok(AppServices::new(Services::new(store, options)))
}
