use thiserror::Error;

#[derive(Error, Debug)]
pub enum StampError {
    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("Failed to encode PDF: {0}")]
    Encoding(String),

    #[error("Page index {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    #[error("Invalid stamp options: {0}")]
    InvalidOptions(String),

    #[error("PDF operation failed: {0}")]
    Operation(String),
}
