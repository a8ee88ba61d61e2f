//! External service clients/adapters.

pub mod pdf_converter;

pub use pdf_converter::{ConversionError, PdfTableConverter, UploadGuard};
