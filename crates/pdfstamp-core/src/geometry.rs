//! Stamp geometry
//!
//! Callers describe the stamp position in pixels measured down from the top
//! edge of the page. PDF geometry is in points with the origin at the bottom
//! left, so everything here stays in a top-left frame and the document layer
//! does the final flip into user space.

use crate::error::StampError;

/// Points per pixel, assuming a 96 dpi display.
pub const PX_TO_PT: f32 = 0.75;

/// Box height as a multiple of the font size.
pub const BOX_HEIGHT_FACTOR: f32 = 1.8;

pub const DEFAULT_TOP_OFFSET_PX: i32 = 10;
pub const DEFAULT_FONT_SIZE: f32 = 13.0;

/// Convert a caller-facing pixel offset to PDF points
pub fn px_to_pt(px: i32) -> f32 {
    px as f32 * PX_TO_PT
}

/// Label drawn into the stamp box
pub fn billing_label(code: &str) -> String {
    format!("Billing Code: {}", code)
}

/// Rectangle in top-left page space (y grows downward), in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBox {
    pub x0: f32,
    pub top: f32,
    pub x1: f32,
    pub bottom: f32,
}

impl TextBox {
    /// Full-width banner starting `top_offset_px` below the top edge,
    /// tall enough for one line at `font_size`.
    pub fn banner(page_width: f32, top_offset_px: i32, font_size: f32) -> Self {
        let top = px_to_pt(top_offset_px);
        Self {
            x0: 0.0,
            top,
            x1: page_width,
            bottom: top + font_size * BOX_HEIGHT_FACTOR,
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Formatting options for a stamp request
#[derive(Debug, Clone, PartialEq)]
pub struct StampOptions {
    /// Stamp every page instead of only the first
    pub apply_to_all_pages: bool,
    pub top_offset_px: i32,
    pub font_size: f32,
}

impl Default for StampOptions {
    fn default() -> Self {
        Self {
            apply_to_all_pages: false,
            top_offset_px: DEFAULT_TOP_OFFSET_PX,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl StampOptions {
    pub fn validate(&self) -> Result<(), StampError> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(StampError::InvalidOptions(format!(
                "font size must be a positive number, got {}",
                self.font_size
            )));
        }
        Ok(())
    }

    /// Zero-based page indices to stamp
    pub fn target_pages(&self, page_count: usize) -> Vec<usize> {
        if self.apply_to_all_pages {
            (0..page_count).collect()
        } else {
            vec![0]
        }
    }
}
