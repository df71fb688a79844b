//! Byte decoding for input pages.

use std::borrow::Cow;

/// How far into a page we look for a charset declaration. The HTML standard
/// requires `<meta charset>` to appear within the first 1024 bytes.
const CHARSET_PRESCAN_LEN: usize = 1024;

/// Decode bytes to a string, handling various encodings.
///
/// 1. UTF-8 (a BOM is handled by encoding_rs)
/// 2. the hint encoding, usually from [`extract_charset`]
/// 3. Windows-1252, which older generated pages were often saved as
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract the declared charset from a page's prefix.
///
/// Recognizes `<meta charset="...">`, the `charset=` parameter of a
/// `<meta http-equiv="Content-Type" content="...">`, and an XML declaration's
/// `encoding="..."`. Only the first 1024 bytes are checked.
pub fn extract_charset(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(CHARSET_PRESCAN_LEN)];

    find_value_after(prefix, b"charset=").or_else(|| find_value_after(prefix, b"encoding="))
}

/// Check whether an encoding label names UTF-8 (`utf-8`, `UTF8`, `unicode-1-1-utf-8`, ...).
pub fn is_utf8_label(label: &str) -> bool {
    encoding_rs::Encoding::for_label(label.trim().as_bytes()) == Some(encoding_rs::UTF_8)
}

/// Rewrite the `charset=` parameter of a `Content-Type` value to `utf-8`.
///
/// Returns `None` when there is no parameter or it already names UTF-8.
pub fn with_utf8_charset(content: &str) -> Option<String> {
    let key = "charset=";
    let start = content.to_ascii_lowercase().find(key)? + key.len();
    let rest = &content[start..];
    let end = rest
        .find(|c: char| c == ';' || c.is_whitespace())
        .unwrap_or(rest.len());
    let label = rest[..end].trim_matches(|c| c == '"' || c == '\'');

    if is_utf8_label(label) {
        return None;
    }
    Some(format!("{}utf-8{}", &content[..start], &rest[end..]))
}

/// Find `key` (ASCII case-insensitive) and return the token that follows,
/// quoted or bare.
fn find_value_after<'a>(haystack: &'a [u8], key: &[u8]) -> Option<&'a str> {
    let pos = haystack
        .windows(key.len())
        .position(|w| w.eq_ignore_ascii_case(key))?;
    let rest = &haystack[pos + key.len()..];

    let (start, terminator): (usize, &[u8]) = match rest.first()? {
        b'"' => (1, b"\""),
        b'\'' => (1, b"'"),
        _ => (0, b"\"'; />\t\r\n"),
    };
    let value = &rest[start..];
    let end = value
        .iter()
        .position(|b| terminator.contains(b))
        .unwrap_or(value.len());

    let name = std::str::from_utf8(&value[..end]).ok()?.trim();
    (!name.is_empty()).then_some(name)
}
