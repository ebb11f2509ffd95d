//! PDF document access
//!
//! The stamp operation only needs three things from a PDF library: open a
//! document from bytes, draw centered text into a box on a page, and write
//! the result back out. [`PdfDocument`] captures exactly that, and
//! [`LopdfDocument`] provides it on top of lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::error::StampError;
use crate::geometry::TextBox;
use crate::metrics;

/// Resource name the stamp font is registered under on each page
const FONT_KEY: &str = "FStampHelv";

/// Limit for walking the page tree when resolving inherited attributes
const MAX_TREE_DEPTH: usize = 32;

/// US Letter, used when a page carries no MediaBox at all
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

pub trait PdfDocument: Sized {
    fn open(bytes: &[u8]) -> Result<Self, StampError>;

    fn page_count(&self) -> usize;

    /// Displayed width of the page at zero-based `index`, in points.
    ///
    /// Accounts for the CropBox and for `/Rotate`.
    fn page_width(&self, index: usize) -> Result<f32, StampError>;

    /// Draw `text` horizontally centered inside `rect` on page `index`
    fn insert_centered_text(
        &mut self,
        index: usize,
        rect: &TextBox,
        text: &str,
        font_size: f32,
    ) -> Result<(), StampError>;

    fn save(self) -> Result<Vec<u8>, StampError>;
}

pub struct LopdfDocument {
    doc: Document,
    pages: Vec<ObjectId>,
    font_id: Option<ObjectId>,
}

impl LopdfDocument {
    fn page_id(&self, index: usize) -> Result<ObjectId, StampError> {
        self.pages
            .get(index)
            .copied()
            .ok_or(StampError::PageOutOfRange {
                index,
                count: self.pages.len(),
            })
    }

    /// Rectangle stored under `key` (inherited), normalized to `[llx, lly, urx, ury]`
    fn page_box(&self, page_id: ObjectId, key: &[u8]) -> Option<[f32; 4]> {
        let values: Vec<f32> = match inherited_attribute(&self.doc, page_id, key)? {
            Object::Array(arr) if arr.len() == 4 => arr
                .iter()
                .map(|o| resolve(&self.doc, o).and_then(|o| o.as_float().ok()))
                .collect::<Option<_>>()?,
            _ => return None,
        };
        Some([
            values[0].min(values[2]),
            values[1].min(values[3]),
            values[0].max(values[2]),
            values[1].max(values[3]),
        ])
    }

    /// What a viewer shows for the page: the CropBox clipped to the
    /// MediaBox, turned by `/Rotate`
    fn frame(&self, page_id: ObjectId) -> PageFrame {
        let media = self
            .page_box(page_id, b"MediaBox")
            .unwrap_or(DEFAULT_MEDIA_BOX);
        let visible = self
            .page_box(page_id, b"CropBox")
            .and_then(|crop| intersect(crop, media))
            .unwrap_or(media);

        let rotation = inherited_attribute(&self.doc, page_id, b"Rotate")
            .and_then(|o| {
                o.as_i64()
                    .ok()
                    .or_else(|| o.as_float().ok().map(|f| f.round() as i64))
            })
            .map(normalize_rotation)
            .unwrap_or(0);

        PageFrame { visible, rotation }
    }

    /// Shared Helvetica font object, created on first use
    fn font_id(&mut self) -> ObjectId {
        if let Some(id) = self.font_id {
            return id;
        }
        let id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => metrics::FONT_NAME,
            "Encoding" => "WinAnsiEncoding",
        });
        self.font_id = Some(id);
        id
    }

    /// Point the page at a resource dictionary that carries the stamp font.
    ///
    /// The page's effective resources (inline, indirect or inherited) are
    /// copied into a fresh inline dictionary, so sibling pages sharing the
    /// original dictionary are left untouched.
    fn register_font(&mut self, page_id: ObjectId) -> Result<(), StampError> {
        let font_id = self.font_id();

        let mut resources = match inherited_attribute(&self.doc, page_id, b"Resources") {
            Some(Object::Dictionary(dict)) => dict,
            _ => Dictionary::new(),
        };
        let mut fonts = match resources
            .get(b"Font")
            .ok()
            .and_then(|o| resolve(&self.doc, o))
        {
            Some(Object::Dictionary(dict)) => dict.clone(),
            _ => Dictionary::new(),
        };
        fonts.set(FONT_KEY, Object::Reference(font_id));
        resources.set("Font", Object::Dictionary(fonts));

        page_dict_mut(&mut self.doc, page_id)?.set("Resources", Object::Dictionary(resources));
        Ok(())
    }

    /// Append `operations` after the page's existing content.
    ///
    /// Existing content is bracketed in `q`/`Q` so a transform or color left
    /// active by the original page cannot displace the stamp.
    fn append_content(
        &mut self,
        page_id: ObjectId,
        operations: Vec<Operation>,
    ) -> Result<(), StampError> {
        let existing: Vec<Object> = {
            let page = self
                .doc
                .get_dictionary(page_id)
                .map_err(|e| StampError::Operation(e.to_string()))?;
            match page.get(b"Contents") {
                Ok(Object::Reference(id)) => match self.doc.get_object(*id) {
                    Ok(Object::Array(arr)) => arr.clone(),
                    _ => vec![Object::Reference(*id)],
                },
                Ok(Object::Array(arr)) => arr.clone(),
                _ => Vec::new(),
            }
        };

        let mut stamp_ops = Vec::with_capacity(operations.len() + 1);
        let mut contents = Vec::with_capacity(existing.len() + 2);

        if !existing.is_empty() {
            let open = encode_operations(vec![Operation::new("q", vec![])])?;
            contents.push(Object::Reference(
                self.doc.add_object(Stream::new(Dictionary::new(), open)),
            ));
            contents.extend(existing);
            stamp_ops.push(Operation::new("Q", vec![]));
        }

        stamp_ops.extend(operations);
        let stamp = encode_operations(stamp_ops)?;
        contents.push(Object::Reference(
            self.doc.add_object(Stream::new(Dictionary::new(), stamp)),
        ));

        page_dict_mut(&mut self.doc, page_id)?.set("Contents", Object::Array(contents));
        Ok(())
    }
}

impl PdfDocument for LopdfDocument {
    fn open(bytes: &[u8]) -> Result<Self, StampError> {
        if bytes.is_empty() {
            return Err(StampError::Parse("empty document".into()));
        }
        let doc = Document::load_mem(bytes).map_err(|e| StampError::Parse(e.to_string()))?;
        let pages = doc.get_pages().into_values().collect();
        Ok(Self {
            doc,
            pages,
            font_id: None,
        })
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_width(&self, index: usize) -> Result<f32, StampError> {
        Ok(self.frame(self.page_id(index)?).width())
    }

    fn insert_centered_text(
        &mut self,
        index: usize,
        rect: &TextBox,
        text: &str,
        font_size: f32,
    ) -> Result<(), StampError> {
        let page_id = self.page_id(index)?;
        let box_width = rect.width();
        if box_width <= 0.0 {
            return Err(StampError::Operation(format!(
                "text box on page {} has no width",
                index
            )));
        }

        let encoded = metrics::encode_win_ansi(text);
        let natural_width = metrics::text_width(&encoded, font_size);
        // Shrink rather than wrap: the box only ever holds one line.
        let font_size = if natural_width > box_width {
            font_size * box_width / natural_width
        } else {
            font_size
        };
        let text_width = metrics::text_width(&encoded, font_size);

        // Text is laid out upright in the displayed page, origin at its
        // bottom-left corner; `cm` carries that into user space.
        let frame = self.frame(page_id);
        let x = rect.x0 + (box_width - text_width) / 2.0;
        let baseline = frame.height() - rect.top - font_size * metrics::ASCENT / 1000.0;
        let matrix: Vec<Object> = frame.matrix().iter().map(|&v| v.into()).collect();

        self.register_font(page_id)?;
        self.append_content(
            page_id,
            vec![
                Operation::new("q", vec![]),
                Operation::new("cm", matrix),
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(FONT_KEY.as_bytes().to_vec()), font_size.into()],
                ),
                Operation::new("g", vec![0.into()]),
                Operation::new("Td", vec![x.into(), baseline.into()]),
                Operation::new("Tj", vec![Object::String(encoded, StringFormat::Literal)]),
                Operation::new("ET", vec![]),
                Operation::new("Q", vec![]),
            ],
        )
    }

    fn save(mut self) -> Result<Vec<u8>, StampError> {
        let mut output = Vec::new();
        self.doc
            .save_to(&mut output)
            .map_err(|e| StampError::Encoding(e.to_string()))?;
        Ok(output)
    }
}

/// Visible rectangle of a page and the clockwise rotation a viewer applies
#[derive(Debug, Clone, Copy, PartialEq)]
struct PageFrame {
    visible: [f32; 4],
    rotation: i64,
}

impl PageFrame {
    fn is_sideways(&self) -> bool {
        self.rotation == 90 || self.rotation == 270
    }

    /// Displayed width, in points
    fn width(&self) -> f32 {
        let [x0, y0, x1, y1] = self.visible;
        if self.is_sideways() {
            y1 - y0
        } else {
            x1 - x0
        }
    }

    /// Displayed height, in points
    fn height(&self) -> f32 {
        let [x0, y0, x1, y1] = self.visible;
        if self.is_sideways() {
            x1 - x0
        } else {
            y1 - y0
        }
    }

    /// `cm` operands taking upright display coordinates (origin at the
    /// displayed bottom-left corner) to user space
    fn matrix(&self) -> [f32; 6] {
        let [x0, y0, x1, y1] = self.visible;
        match self.rotation {
            90 => [0.0, 1.0, -1.0, 0.0, x1, y0],
            180 => [-1.0, 0.0, 0.0, -1.0, x1, y1],
            270 => [0.0, -1.0, 1.0, 0.0, x0, y1],
            _ => [1.0, 0.0, 0.0, 1.0, x0, y0],
        }
    }
}

/// `/Rotate` must be a multiple of 90; anything else is treated as upright
fn normalize_rotation(raw: i64) -> i64 {
    let rotation = raw.rem_euclid(360);
    if rotation % 90 == 0 {
        rotation
    } else {
        0
    }
}

fn intersect(a: [f32; 4], b: [f32; 4]) -> Option<[f32; 4]> {
    let clipped = [a[0].max(b[0]), a[1].max(b[1]), a[2].min(b[2]), a[3].min(b[3])];
    (clipped[2] > clipped[0] && clipped[3] > clipped[1]).then_some(clipped)
}

fn encode_operations(operations: Vec<Operation>) -> Result<Vec<u8>, StampError> {
    Content { operations }
        .encode()
        .map_err(|e| StampError::Encoding(e.to_string()))
}

fn page_dict_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary, StampError> {
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| StampError::Operation(e.to_string()))
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Look up `key` on the page, walking up through `Parent` nodes
fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return resolve(doc, value).cloned();
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Single page whose Resources and MediaBox live on the Pages node
    fn create_inherited_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Times-Roman",
        });
        let content = Content {
            operations: vec![
                Operation::new(
                    "cm",
                    vec![1.into(), 0.into(), 0.into(), 1.into(), 50.into(), 50.into()],
                ),
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Tj", vec![Object::string_literal("Body")]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().unwrap(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Contents" => Object::Reference(content_id),
        });
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
            },
        });
        doc.get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .unwrap()
            .set("Parent", Object::Reference(pages_id));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    fn rect(values: [i64; 4]) -> Object {
        Object::Array(values.iter().map(|&v| v.into()).collect())
    }

    /// Single page built from `page`, under a Pages node carrying `inherited`
    fn create_page_pdf(page: Dictionary, inherited: Dictionary) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let page_id = doc.add_object(page);
        let mut pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        };
        for (key, value) in inherited.iter() {
            pages.set(key.clone(), value.clone());
        }
        let pages_id = doc.add_object(pages);
        doc.get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .unwrap()
            .set("Parent", Object::Reference(pages_id));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    /// Single page with a MediaBox that does not start at the origin
    fn create_offset_origin_pdf() -> Vec<u8> {
        create_page_pdf(
            dictionary! {
                "Type" => "Page",
                "MediaBox" => rect([100, 200, 400, 600]),
            },
            Dictionary::new(),
        )
    }

    /// US Letter page with extra page-level entries
    fn create_letter_pdf(extra: Dictionary) -> Vec<u8> {
        let mut page = dictionary! {
            "Type" => "Page",
            "MediaBox" => rect([0, 0, 612, 792]),
        };
        for (key, value) in extra.iter() {
            page.set(key.clone(), value.clone());
        }
        create_page_pdf(page, Dictionary::new())
    }

    fn stamp_default(bytes: &[u8]) -> Vec<Operation> {
        let mut doc = LopdfDocument::open(bytes).unwrap();
        let width = doc.page_width(0).unwrap();
        let rect = TextBox::banner(width, 10, 13.0);
        doc.insert_centered_text(0, &rect, "Billing Code: ABC123", 13.0)
            .unwrap();
        stamp_operations(&doc.save().unwrap())
    }

    /// Where the matrix sends the point (`x`, `y`)
    fn apply(matrix: &[f32], x: f32, y: f32) -> (f32, f32) {
        (
            matrix[0] * x + matrix[2] * y + matrix[4],
            matrix[1] * x + matrix[3] * y + matrix[5],
        )
    }

    fn stamp_operations(bytes: &[u8]) -> Vec<Operation> {
        let doc = Document::load_mem(bytes).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();
        let content = doc.get_page_content(page_id).unwrap();
        Content::decode(&content).unwrap().operations
    }

    fn operands_of(ops: &[Operation], operator: &str) -> Vec<f32> {
        ops.iter()
            .rev()
            .find(|op| op.operator == operator)
            .map(|op| {
                op.operands
                    .iter()
                    .filter_map(|o| o.as_float().ok())
                    .collect()
            })
            .unwrap()
    }

    #[test]
    fn test_open_rejects_empty_bytes() {
        assert!(matches!(
            LopdfDocument::open(&[]),
            Err(StampError::Parse(_))
        ));
    }

    #[test]
    fn test_open_rejects_garbage() {
        assert!(matches!(
            LopdfDocument::open(b"definitely not a pdf"),
            Err(StampError::Parse(_))
        ));
    }

    #[test]
    fn test_inherited_media_box_width() {
        let doc = LopdfDocument::open(&create_inherited_pdf()).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.page_width(0).unwrap(), 595.0);
    }

    #[test]
    fn test_page_width_out_of_range() {
        let doc = LopdfDocument::open(&create_inherited_pdf()).unwrap();
        assert!(matches!(
            doc.page_width(3),
            Err(StampError::PageOutOfRange { index: 3, count: 1 })
        ));
    }

    #[test]
    fn test_insert_keeps_inherited_fonts() {
        let mut doc = LopdfDocument::open(&create_inherited_pdf()).unwrap();
        let rect = TextBox::banner(595.0, 10, 13.0);
        doc.insert_centered_text(0, &rect, "Billing Code: X", 13.0)
            .unwrap();
        let bytes = doc.save().unwrap();

        let reloaded = Document::load_mem(&bytes).unwrap();
        let page_id = *reloaded.get_pages().get(&1).unwrap();
        let page = reloaded.get_dictionary(page_id).unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
        assert!(fonts.has(b"F1"));
        assert!(fonts.has(FONT_KEY.as_bytes()));
    }

    #[test]
    fn test_existing_content_is_isolated() {
        let mut doc = LopdfDocument::open(&create_inherited_pdf()).unwrap();
        let rect = TextBox::banner(595.0, 10, 13.0);
        doc.insert_centered_text(0, &rect, "Billing Code: X", 13.0)
            .unwrap();
        let ops = stamp_operations(&doc.save().unwrap());

        assert_eq!(ops.first().unwrap().operator, "q");
        let q_count = ops.iter().filter(|op| op.operator == "q").count();
        let big_q_count = ops.iter().filter(|op| op.operator == "Q").count();
        assert_eq!(q_count, big_q_count);
    }

    #[test]
    fn test_text_is_centered_and_below_top_edge() {
        let mut doc = LopdfDocument::open(&create_inherited_pdf()).unwrap();
        let rect = TextBox::banner(595.0, 10, 13.0);
        let label = "Billing Code: ABC123";
        doc.insert_centered_text(0, &rect, label, 13.0).unwrap();
        let ops = stamp_operations(&doc.save().unwrap());

        let width = metrics::text_width(&metrics::encode_win_ansi(label), 13.0);
        let td = operands_of(&ops, "Td");
        assert!((td[0] - (595.0 - width) / 2.0).abs() < 0.01);
        assert!((td[1] - (842.0 - 7.5 - 13.0 * 0.718)).abs() < 0.01);

        let tf = operands_of(&ops, "Tf");
        assert_eq!(tf, vec![13.0]);
    }

    #[test]
    fn test_offset_media_box_origin() {
        let mut doc = LopdfDocument::open(&create_offset_origin_pdf()).unwrap();
        assert_eq!(doc.page_width(0).unwrap(), 300.0);
        let rect = TextBox::banner(300.0, 0, 10.0);
        doc.insert_centered_text(0, &rect, "X", 10.0).unwrap();
        let ops = stamp_operations(&doc.save().unwrap());

        let width = metrics::text_width(b"X", 10.0);
        assert_eq!(
            operands_of(&ops, "cm"),
            vec![1.0, 0.0, 0.0, 1.0, 100.0, 200.0]
        );
        let td = operands_of(&ops, "Td");
        assert!((td[0] - (300.0 - width) / 2.0).abs() < 0.01);
        assert!((td[1] - (400.0 - 7.18)).abs() < 0.01);
    }

    #[test]
    fn test_crop_box_sets_top_edge() {
        let bytes = create_letter_pdf(dictionary! { "CropBox" => rect([0, 0, 612, 700]) });
        assert_eq!(LopdfDocument::open(&bytes).unwrap().page_width(0).unwrap(), 612.0);

        let ops = stamp_default(&bytes);
        let cm = operands_of(&ops, "cm");
        let td = operands_of(&ops, "Td");
        let (_, y) = apply(&cm, td[0], td[1]);
        assert!((y - (700.0 - 7.5 - 13.0 * 0.718)).abs() < 0.01);
    }

    #[test]
    fn test_crop_box_sets_width_and_left_edge() {
        let bytes = create_letter_pdf(dictionary! { "CropBox" => rect([50, 40, 562, 752]) });
        assert_eq!(LopdfDocument::open(&bytes).unwrap().page_width(0).unwrap(), 512.0);

        let ops = stamp_default(&bytes);
        let cm = operands_of(&ops, "cm");
        let td = operands_of(&ops, "Td");
        let width = metrics::text_width(&metrics::encode_win_ansi("Billing Code: ABC123"), 13.0);
        let (x, y) = apply(&cm, td[0], td[1]);
        assert!((x - (50.0 + (512.0 - width) / 2.0)).abs() < 0.01);
        assert!((y - (752.0 - 7.5 - 13.0 * 0.718)).abs() < 0.01);
    }

    #[test]
    fn test_crop_box_is_clipped_to_media_box() {
        let bytes = create_letter_pdf(dictionary! { "CropBox" => rect([-20, -20, 900, 900]) });
        let doc = LopdfDocument::open(&bytes).unwrap();
        assert_eq!(doc.page_width(0).unwrap(), 612.0);
    }

    #[test]
    fn test_crop_box_outside_media_box_is_ignored() {
        let bytes = create_letter_pdf(dictionary! { "CropBox" => rect([700, 0, 800, 100]) });
        let doc = LopdfDocument::open(&bytes).unwrap();
        assert_eq!(doc.page_width(0).unwrap(), 612.0);
    }

    #[test]
    fn test_rotated_page_uses_displayed_width() {
        let bytes = create_letter_pdf(dictionary! { "Rotate" => 90 });
        assert_eq!(LopdfDocument::open(&bytes).unwrap().page_width(0).unwrap(), 792.0);

        let ops = stamp_default(&bytes);
        let cm = operands_of(&ops, "cm");
        assert_eq!(cm, vec![0.0, 1.0, -1.0, 0.0, 612.0, 0.0]);

        // Displayed top is the user-space left edge: the baseline sits just
        // right of x = 0, and the label runs up the page around its middle.
        let td = operands_of(&ops, "Td");
        let (x, y) = apply(&cm, td[0], td[1]);
        assert!((x - (7.5 + 13.0 * 0.718)).abs() < 0.01);
        let width = metrics::text_width(&metrics::encode_win_ansi("Billing Code: ABC123"), 13.0);
        assert!((y - (792.0 - width) / 2.0).abs() < 0.01);
    }

    #[test]
    fn test_rotation_is_inherited_and_normalized() {
        let bytes = create_page_pdf(
            dictionary! {
                "Type" => "Page",
                "MediaBox" => rect([0, 0, 612, 792]),
            },
            dictionary! { "Rotate" => -90 },
        );
        let ops = stamp_default(&bytes);
        assert_eq!(
            operands_of(&ops, "cm"),
            vec![0.0, -1.0, 1.0, 0.0, 0.0, 792.0]
        );
    }

    #[test]
    fn test_frame_corners_for_each_rotation() {
        let visible = [10.0, 20.0, 110.0, 220.0];
        // Displayed top-left corner, in upright display coordinates, and
        // the user-space corner a viewer shows there.
        let cases = [
            (0, (10.0, 220.0)),
            (90, (10.0, 20.0)),
            (180, (110.0, 20.0)),
            (270, (110.0, 220.0)),
        ];
        for (rotation, expected) in cases {
            let frame = PageFrame { visible, rotation };
            let matrix = frame.matrix();
            assert_eq!(apply(&matrix, 0.0, frame.height()), expected, "rotate {}", rotation);
        }
    }

    #[test]
    fn test_normalize_rotation() {
        assert_eq!(normalize_rotation(0), 0);
        assert_eq!(normalize_rotation(450), 90);
        assert_eq!(normalize_rotation(-90), 270);
        assert_eq!(normalize_rotation(45), 0);
    }

    #[test]
    fn test_long_label_shrinks_to_fit() {
        let mut doc = LopdfDocument::open(&create_offset_origin_pdf()).unwrap();
        let rect = TextBox::banner(300.0, 10, 13.0);
        let label = format!("Billing Code: {}", "W".repeat(60));
        doc.insert_centered_text(0, &rect, &label, 13.0).unwrap();
        let ops = stamp_operations(&doc.save().unwrap());

        let size = operands_of(&ops, "Tf")[0];
        assert!(size < 13.0);
        let width = metrics::text_width(&metrics::encode_win_ansi(&label), size);
        assert!(width <= 300.0 * 1.01);
    }

    #[test]
    fn test_zero_width_box_is_rejected() {
        let mut doc = LopdfDocument::open(&create_offset_origin_pdf()).unwrap();
        let rect = TextBox::banner(0.0, 10, 13.0);
        assert!(matches!(
            doc.insert_centered_text(0, &rect, "X", 13.0),
            Err(StampError::Operation(_))
        ));
    }
}
