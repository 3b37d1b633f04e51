//! Text clean-up before it reaches the PDF or the file system
//!
//! Report text is drawn with the standard Helvetica font in WinAnsi
//! encoding, so typographic punctuation pasted from word processors is
//! folded to ASCII first and anything still outside the encoding is
//! reported instead of being silently mangled.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::RenderError;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^\w.\-]").unwrap();
}

/// Fold typographic punctuation to plain ASCII
pub fn normalize_punctuation(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\u{2013}' | '\u{2014}' | '\u{2012}' | '\u{2010}' | '\u{2011}' | '\u{2212}' => {
                out.push('-')
            }
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => out.push('"'),
            '\u{2026}' => out.push_str("..."),
            '\u{2022}' => out.push('-'),
            '\u{00A0}' | '\u{202F}' | '\u{2009}' => out.push(' '),
            '\u{200B}' | '\u{FEFF}' => {}
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

/// WinAnsi code points 0x80..=0x9F that differ from Latin-1
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('\u{20AC}', 0x80),
    ('\u{201A}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8A),
    ('\u{2039}', 0x8B),
    ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9A),
    ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C),
    ('\u{017E}', 0x9E),
    ('\u{0178}', 0x9F),
];

fn win_ansi_byte(c: char) -> Option<u8> {
    match c {
        ' '..='~' => Some(c as u8),
        '\u{00A0}'..='\u{00FF}' => Some(c as u32 as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|(_, byte)| *byte),
    }
}

/// Normalize and encode text for a PDF string.
///
/// `context` names the value in the error when a character cannot be drawn.
pub fn encode_pdf_text(s: &str, context: &str) -> Result<Vec<u8>, RenderError> {
    normalize_punctuation(s)
        .chars()
        .map(|ch| {
            win_ansi_byte(ch).ok_or_else(|| RenderError::UnsupportedCharacter {
                ch,
                context: context.to_string(),
            })
        })
        .collect()
}

/// Like [`encode_pdf_text`] but replaces undrawable characters with `?`
pub fn encode_pdf_text_lossy(s: &str) -> Vec<u8> {
    normalize_punctuation(s)
        .chars()
        .map(|ch| win_ansi_byte(ch).unwrap_or(b'?'))
        .collect()
}

/// Turn free text into a file-name component
///
/// Whitespace runs become `_`; anything besides word characters, `.` and `-`
/// is dropped.
pub fn filename_component(s: &str) -> String {
    let normalized = normalize_punctuation(s);
    let underscored = WHITESPACE_RUN.replace_all(normalized.trim(), "_");
    let safe = UNSAFE_FILENAME_CHARS.replace_all(&underscored, "");
    safe.trim_matches(|c| c == '.' || c == '_').to_string()
}
