//! Billing-code stamping for PDF documents
//!
//! Opens a PDF with lopdf, draws a centered "Billing Code: ..." banner near
//! the top of the first page (or every page) and re-serializes the result.

pub mod document;
pub mod error;
pub mod geometry;
pub mod metrics;
pub mod stamp;

pub use document::{LopdfDocument, PdfDocument};
pub use error::StampError;
pub use geometry::{billing_label, px_to_pt, StampOptions, TextBox};
pub use stamp::{stamp_document, stamp_pdf_bytes};

