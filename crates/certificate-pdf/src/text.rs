//! Text encoding, measurement and word wrap

use crate::fonts::{glyph_width, FontStyle};
use crate::units::PT_PER_MM;

/// Windows-1252 characters in 0x80..=0x9F; `None` marks the unused slots
const WIN_ANSI_HIGH: [Option<char>; 32] = [
    Some('€'), None, Some('‚'), Some('ƒ'), Some('„'), Some('…'), Some('†'), Some('‡'),
    Some('ˆ'), Some('‰'), Some('Š'), Some('‹'), Some('Œ'), None, Some('Ž'), None,
    None, Some('‘'), Some('’'), Some('“'), Some('”'), Some('•'), Some('–'), Some('—'),
    Some('˜'), Some('™'), Some('š'), Some('›'), Some('œ'), None, Some('ž'), Some('Ÿ'),
];

/// Encode text for a WinAnsiEncoding Type1 font.
///
/// Latin-1 maps directly and the 0x80..=0x9F block follows Windows-1252.
/// Whitespace controls become spaces and anything else becomes '?'.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\t' | '\n' | '\r' => b' ',
            '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
            _ => WIN_ANSI_HIGH
                .iter()
                .position(|&slot| slot == Some(c))
                .map(|i| 0x80 + i as u8)
                .unwrap_or(b'?'),
        })
        .collect()
}

/// Inverse of [`encode_win_ansi`]
pub fn decode_win_ansi(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x80..=0x9F => WIN_ANSI_HIGH[(b - 0x80) as usize].unwrap_or('?'),
            _ => b as char,
        })
        .collect()
}

/// Width in 1/1000 em of already-encoded text
pub fn encoded_width(bytes: &[u8], style: FontStyle) -> u32 {
    bytes.iter().map(|&b| glyph_width(style, b) as u32).sum()
}

/// Rendered width of `text` in millimeters at `size_pt`
pub fn text_width_mm(text: &str, style: FontStyle, size_pt: f64) -> f64 {
    let units = encoded_width(&encode_win_ansi(text), style) as f64;
    units * size_pt / 1000.0 / PT_PER_MM
}

/// Greedy word wrap to `max_width_mm`.
///
/// Whitespace runs collapse to one space. A word wider than the limit is
/// kept whole on its own line and overflows.
pub fn wrap_text(text: &str, style: FontStyle, size_pt: f64, max_width_mm: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{} {}", current, word);
        if text_width_mm(&candidate, style, size_pt) <= max_width_mm {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// English ordinal for a day of the month ("1st", "12th", "23rd")
pub fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}
