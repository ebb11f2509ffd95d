//! Helvetica font metrics
//!
//! Advance widths from the Adobe Helvetica AFM, in 1/1000 text space units,
//! for the printable ASCII range and the WinAnsi 0x80..=0x9F block. Latin-1
//! characters fall back to the width of a lowercase letter, which is what
//! most of them share.

/// Base font used for every stamp
pub const FONT_NAME: &str = "Helvetica";

/// Ascender height in 1/1000 units
pub const ASCENT: f32 = 718.0;

const FALLBACK_WIDTH: u16 = 556;

/// Widths for 0x20..=0x7E
const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, // space ! " # $ % & '
    333, 333, 389, 584, 278, 333, 278, 278, // ( ) * + , - . /
    556, 556, 556, 556, 556, 556, 556, 556, // 0-7
    556, 556, 278, 278, 584, 584, 584, 556, // 8 9 : ; < = > ?
    1015, 667, 667, 722, 722, 667, 611, 778, // @ A-G
    722, 278, 500, 667, 556, 833, 722, 778, // H-O
    667, 778, 722, 667, 611, 722, 667, 944, // P-W
    667, 667, 611, 278, 278, 278, 469, 556, // X Y Z [ \ ] ^ _
    333, 556, 556, 500, 556, 556, 278, 556, // ` a-g
    556, 222, 222, 500, 222, 833, 556, 556, // h-o
    556, 556, 333, 500, 278, 556, 500, 722, // p-w
    500, 500, 500, 334, 260, 334, 584, // x y z { | } ~
];

/// WinAnsi codes 0x80..=0x9F: character, code, width
const WIN_ANSI_EXTRAS: [(char, u8, u16); 27] = [
    ('€', 0x80, 556),
    ('‚', 0x82, 222),
    ('ƒ', 0x83, 556),
    ('„', 0x84, 333),
    ('…', 0x85, 1000),
    ('†', 0x86, 556),
    ('‡', 0x87, 556),
    ('ˆ', 0x88, 333),
    ('‰', 0x89, 1000),
    ('Š', 0x8A, 667),
    ('‹', 0x8B, 333),
    ('Œ', 0x8C, 1000),
    ('Ž', 0x8E, 611),
    ('‘', 0x91, 222),
    ('’', 0x92, 222),
    ('“', 0x93, 333),
    ('”', 0x94, 333),
    ('•', 0x95, 350),
    ('–', 0x96, 556),
    ('—', 0x97, 1000),
    ('˜', 0x98, 333),
    ('™', 0x99, 1000),
    ('š', 0x9A, 500),
    ('›', 0x9B, 333),
    ('œ', 0x9C, 944),
    ('ž', 0x9E, 500),
    ('Ÿ', 0x9F, 667),
];

/// Encode text for a WinAnsiEncoding simple font.
///
/// Printable ASCII and Latin-1 map to themselves, as do the typographic
/// characters WinAnsi places at 0x80..=0x9F (euro, curly quotes, dashes,
/// ...). Whitespace becomes a space and anything else is replaced with `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => match WIN_ANSI_EXTRAS.iter().find(|(ch, _, _)| *ch == c) {
                Some(&(_, code, _)) => code,
                None if c.is_whitespace() => b' ',
                None => b'?',
            },
        })
        .collect()
}

/// Advance width of an encoded byte in 1/1000 units
pub fn glyph_width(byte: u8) -> u16 {
    match byte {
        0x20..=0x7E => ASCII_WIDTHS[(byte - 0x20) as usize],
        0x80..=0x9F => WIN_ANSI_EXTRAS
            .iter()
            .find(|(_, code, _)| *code == byte)
            .map_or(FALLBACK_WIDTH, |&(_, _, width)| width),
        _ => FALLBACK_WIDTH,
    }
}

/// Width of encoded text set at `font_size`, in points
pub fn text_width(encoded: &[u8], font_size: f32) -> f32 {
    let units: u32 = encoded.iter().map(|&b| glyph_width(b) as u32).sum();
    units as f32 * font_size / 1000.0
}
