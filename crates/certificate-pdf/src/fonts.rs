//! Standard 14 font selection and Helvetica glyph metrics
//!
//! Certificates only use the Helvetica family, which every PDF viewer
//! ships, so nothing is embedded. Widths come from the Adobe AFM files and
//! are in 1/1000 em. Oblique variants share the upright widths.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub fn base_font(&self) -> &'static str {
        match self {
            FontStyle::Normal => "Helvetica",
            FontStyle::Bold => "Helvetica-Bold",
            FontStyle::Italic => "Helvetica-Oblique",
            FontStyle::BoldItalic => "Helvetica-BoldOblique",
        }
    }

    /// Name under /Resources /Font
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontStyle::Normal => "F1",
            FontStyle::Bold => "F2",
            FontStyle::Italic => "F3",
            FontStyle::BoldItalic => "F4",
        }
    }

    pub fn from_resource_name(name: &[u8]) -> Option<Self> {
        match name {
            b"F1" => Some(FontStyle::Normal),
            b"F2" => Some(FontStyle::Bold),
            b"F3" => Some(FontStyle::Italic),
            b"F4" => Some(FontStyle::BoldItalic),
            _ => None,
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }

    pub fn is_italic(&self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::BoldItalic)
    }
}

/// Helvetica widths for WinAnsi codes 32..=126
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

/// Helvetica-Bold widths for WinAnsi codes 32..=126
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    333, 333, 584, 584, 584, 611, 975, // :..@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    333, 278, 333, 584, 556, 333, // [..`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a..m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n..z
    389, 280, 389, 584, // {..~
];

const DEFAULT_WIDTH: u16 = 556;

/// (Helvetica, Helvetica-Bold) widths for Windows-1252 codes 0x80..=0x9F.
/// Unused slots carry the default width.
const WIN_ANSI_HIGH_WIDTHS: [(u16, u16); 32] = [
    (556, 556),   // Euro
    (556, 556),   // unused
    (222, 278),   // quotesinglbase
    (556, 556),   // florin
    (333, 500),   // quotedblbase
    (1000, 1000), // ellipsis
    (556, 556),   // dagger
    (556, 556),   // daggerdbl
    (333, 333),   // circumflex
    (1000, 1000), // perthousand
    (667, 667),   // Scaron
    (333, 333),   // guilsinglleft
    (1000, 1000), // OE
    (556, 556),   // unused
    (611, 611),   // Zcaron
    (556, 556),   // unused
    (556, 556),   // unused
    (222, 278),   // quoteleft
    (222, 278),   // quoteright
    (333, 500),   // quotedblleft
    (333, 500),   // quotedblright
    (350, 350),   // bullet
    (556, 556),   // endash
    (1000, 1000), // emdash
    (333, 333),   // tilde
    (1000, 1000), // trademark
    (500, 556),   // scaron
    (333, 333),   // guilsinglright
    (944, 944),   // oe
    (556, 556),   // unused
    (500, 500),   // zcaron
    (667, 667),   // Ydieresis
];

/// Width of one WinAnsi-encoded byte in 1/1000 em
pub fn glyph_width(style: FontStyle, code: u8) -> u16 {
    let table = if style.is_bold() {
        &HELVETICA_BOLD
    } else {
        &HELVETICA
    };

    match code {
        32..=126 => table[(code - 32) as usize],
        0x80..=0x9F => {
            let (normal, bold) = WIN_ANSI_HIGH_WIDTHS[(code - 0x80) as usize];
            if style.is_bold() {
                bold
            } else {
                normal
            }
        }
        0xA0 => 278, // no-break space
        _ => match latin1_base_letter(code) {
            Some(base) => table[(base - 32) as usize],
            None => DEFAULT_WIDTH,
        },
    }
}

/// Accented Latin-1 letters share the width of their base letter
fn latin1_base_letter(code: u8) -> Option<u8> {
    let base = match code {
        0xC0..=0xC5 => b'A',
        0xC7 => b'C',
        0xC8..=0xCB => b'E',
        0xCC..=0xCF => b'I',
        0xD1 => b'N',
        0xD2..=0xD6 | 0xD8 => b'O',
        0xD9..=0xDC => b'U',
        0xDD => b'Y',
        0xE0..=0xE5 => b'a',
        0xE7 => b'c',
        0xE8..=0xEB => b'e',
        0xEC..=0xEF => b'i',
        0xF1 => b'n',
        0xF2..=0xF6 | 0xF8 => b'o',
        0xF9..=0xFC => b'u',
        0xFD | 0xFF => b'y',
        _ => return None,
    };
    Some(base)
}
