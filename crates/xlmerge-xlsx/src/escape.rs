//! Text escaping for cell strings
//!
//! XML 1.0 cannot carry most control characters, so spreadsheet files spell
//! them as `_xHHHH_`. A literal underscore that happens to precede such a
//! pattern is itself written as `_x005F_`.

use std::borrow::Cow;

/// Decode `_xHHHH_` sequences (e.g. `_x000d_` = CR, `_x005f_` = underscore)
pub(crate) fn decode_escapes(s: &str) -> Cow<'_, str> {
    if !s.contains("_x") {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('_') {
        result.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match parse_escape(tail) {
            Some(c) => {
                result.push(c);
                rest = &tail[7..];
            }
            None => {
                result.push('_');
                rest = &tail[1..];
            }
        }
    }
    result.push_str(rest);

    Cow::Owned(result)
}

/// Encode characters XML cannot hold, plus underscores that would otherwise
/// be read back as an escape sequence
pub(crate) fn encode_escapes(s: &str) -> Cow<'_, str> {
    let needs_encoding = s
        .char_indices()
        .any(|(i, c)| needs_escape(c) || (c == '_' && parse_escape(&s[i..]).is_some()));
    if !needs_encoding {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 16);
    for (i, c) in s.char_indices() {
        if needs_escape(c) || (c == '_' && parse_escape(&s[i..]).is_some()) {
            result.push_str(&format!("_x{:04X}_", c as u32));
        } else {
            result.push(c);
        }
    }
    Cow::Owned(result)
}

/// Parse one `_xHHHH_` sequence at the start of `s`
fn parse_escape(s: &str) -> Option<char> {
    let bytes = s.as_bytes();
    if bytes.len() < 7 || &bytes[..2] != b"_x" || bytes[6] != b'_' {
        return None;
    }
    let hex = s.get(2..6)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

fn needs_escape(c: char) -> bool {
    // CR is legal XML but parsers fold it into LF
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\r' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}
