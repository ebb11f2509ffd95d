//! Billing-code stamping

use tracing::debug;

use crate::document::{LopdfDocument, PdfDocument};
use crate::error::StampError;
use crate::geometry::{billing_label, StampOptions, TextBox};

/// Stamp `code_text` onto a PDF and return the re-serialized document
pub fn stamp_pdf_bytes(
    pdf_bytes: &[u8],
    code_text: &str,
    options: &StampOptions,
) -> Result<Vec<u8>, StampError> {
    stamp_document::<LopdfDocument>(pdf_bytes, code_text, options)
}

/// Stamp using any [`PdfDocument`] implementation.
///
/// Each target page gets a full-width banner computed from its own width.
/// The input slice is never modified; a new buffer is returned.
pub fn stamp_document<D: PdfDocument>(
    pdf_bytes: &[u8],
    code_text: &str,
    options: &StampOptions,
) -> Result<Vec<u8>, StampError> {
    options.validate()?;

    let mut doc = D::open(pdf_bytes)?;
    let page_count = doc.page_count();
    if page_count == 0 {
        return Err(StampError::PageOutOfRange {
            index: 0,
            count: 0,
        });
    }

    let label = billing_label(code_text);
    let pages = options.target_pages(page_count);
    for &index in &pages {
        let rect = TextBox::banner(
            doc.page_width(index)?,
            options.top_offset_px,
            options.font_size,
        );
        doc.insert_centered_text(index, &rect, &label, options.font_size)?;
    }
    debug!(pages = ?pages, page_count, "stamped billing code");

    doc.save()
}
