//! Charset detection for manifest XML byte streams.
//!
//! Packages in the wild declare encodings they don't actually use;
//! trusting a bad `<?xml ... encoding="..."?>` declaration corrupts
//! downstream parsing. [`detect`] sniffs a BOM first, then verifies any
//! declared encoding actually decodes the sample cleanly, and only falls
//! back to a UTF-8/Windows-1252 heuristic if neither produced an answer.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// A detected charset plus the byte offset at which content (past any BOM)
/// begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedEncoding {
    pub encoding: &'static Encoding,
    pub content_start: usize,
}

const SNIFF_WINDOW: usize = 8 * 1024;

/// Detect the charset of `bytes`, the raw content of an XML document.
pub fn detect(bytes: &[u8]) -> DetectedEncoding {
    if let Some(found) = sniff_bom(bytes) {
        return found;
    }
    if let Some(found) = declared_encoding(bytes) {
        return found;
    }
    let encoding = if looks_like_utf8(bytes) {
        UTF_8
    } else {
        WINDOWS_1252
    };
    DetectedEncoding {
        encoding,
        content_start: 0,
    }
}

fn sniff_bom(bytes: &[u8]) -> Option<DetectedEncoding> {
    const UTF32_BE_BOM: [u8; 4] = [0x00, 0x00, 0xFE, 0xFF];
    const UTF32_LE_BOM: [u8; 4] = [0xFF, 0xFE, 0x00, 0x00];
    const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
    const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];
    const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];

    if bytes.starts_with(&UTF32_BE_BOM) {
        return Some(DetectedEncoding {
            encoding: encoding_rs::UTF_8, // no UTF-32 codec in encoding_rs; content is re-sniffed by the XML layer
            content_start: 4,
        });
    }
    if bytes.starts_with(&UTF8_BOM) {
        return Some(DetectedEncoding {
            encoding: UTF_8,
            content_start: 3,
        });
    }
    // UTF-32LE's BOM is a prefix of UTF-16LE's; check the longer one first.
    if bytes.starts_with(&UTF32_LE_BOM) {
        return Some(DetectedEncoding {
            encoding: encoding_rs::UTF_8,
            content_start: 4,
        });
    }
    if bytes.starts_with(&UTF16_BE_BOM) {
        return Some(DetectedEncoding {
            encoding: encoding_rs::UTF_16BE,
            content_start: 2,
        });
    }
    if bytes.starts_with(&UTF16_LE_BOM) {
        return Some(DetectedEncoding {
            encoding: encoding_rs::UTF_16LE,
            content_start: 2,
        });
    }
    None
}

/// Try decoding the leading sample under a handful of candidate charsets,
/// look for an XML declaration's `encoding="..."` attribute, then verify the
/// declared charset actually decodes the sample without error.
fn declared_encoding(bytes: &[u8]) -> Option<DetectedEncoding> {
    let sample = &bytes[..bytes.len().min(SNIFF_WINDOW)];
    let candidates: &[&Encoding] = &[
        UTF_8,
        WINDOWS_1252,
        encoding_rs::UTF_16BE,
        encoding_rs::UTF_16LE,
    ];

    for candidate in candidates {
        let (text, _, had_errors) = candidate.decode(&sample[..sample.len().min(200)]);
        if had_errors {
            continue;
        }
        let Some(declared_name) = extract_declared_name(&text) else {
            continue;
        };
        let Some(declared) = Encoding::for_label(declared_name.as_bytes()) else {
            continue;
        };
        let (_, _, verify_errors) = declared.decode(sample);
        if verify_errors {
            continue;
        }
        return Some(DetectedEncoding {
            encoding: declared,
            content_start: 0,
        });
    }
    None
}

fn extract_declared_name(text: &str) -> Option<String> {
    let decl_start = text.find("<?xml")?;
    let decl_end = text[decl_start..].find("?>")? + decl_start;
    let decl = &text[decl_start..decl_end];
    let needle = "encoding";
    let pos = decl.to_ascii_lowercase().find(needle)?;
    let rest = &decl[pos + needle.len()..];
    let eq = rest.find('=')?;
    let rest = rest[eq + 1..].trim_start();
    let quote = rest.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let close = rest[1..].find(quote)?;
    Some(rest[1..1 + close].to_string())
}

/// Walk `bytes` as a UTF-8 state machine; a truncated trailing multi-byte
/// sequence is treated as UTF-8 (the buffer may simply be a prefix).
fn looks_like_utf8(bytes: &[u8]) -> bool {
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b < 0x80 {
            i += 1;
            continue;
        }
        let extra = match b {
            0xC2..=0xDF => 1,
            0xE0..=0xEF => 2,
            0xF0..=0xF4 => 3,
            _ => return false, // includes 0xC0, 0xC1, and bytes above 0xF4
        };
        if i + extra >= bytes.len() {
            return true; // truncated tail, assume a split buffer
        }
        for cont in &bytes[i + 1..=i + extra] {
            if !(0x80..=0xBF).contains(cont) {
                return false;
            }
        }
        i += extra + 1;
    }
    true
}
