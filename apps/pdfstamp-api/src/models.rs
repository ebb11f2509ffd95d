//! Request and response models for the stamping API

use pdfstamp_core::geometry::{DEFAULT_FONT_SIZE, DEFAULT_TOP_OFFSET_PX};
use pdfstamp_core::StampOptions;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ApiError;

/// Filename reported in `Content-Disposition` for every stamped document
pub const STAMPED_FILENAME: &str = "invoice-coded.pdf";

/// JSON body for stamping a document fetched from `file_url`
#[derive(Debug, Clone, Deserialize)]
pub struct StampRequest {
    pub code: String,
    pub file_url: Url,
    #[serde(default)]
    pub all_pages: bool,
    #[serde(default = "default_top_offset_px")]
    pub top_offset_px: i32,
    #[serde(default = "default_fontsize")]
    pub fontsize: f32,
}

fn default_top_offset_px() -> i32 {
    DEFAULT_TOP_OFFSET_PX
}

fn default_fontsize() -> f32 {
    DEFAULT_FONT_SIZE
}

impl StampRequest {
    /// Reject URLs we will not fetch and options the stamper cannot honor
    pub fn validate(&self) -> Result<(), ApiError> {
        match self.file_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ApiError::InvalidRequest(format!(
                    "file_url must use http or https, got '{}'",
                    other
                )))
            }
        }
        self.options()
            .validate()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))
    }

    pub fn options(&self) -> StampOptions {
        StampOptions {
            apply_to_all_pages: self.all_pages,
            top_offset_px: self.top_offset_px,
            font_size: self.fontsize,
        }
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}
