//! Shared string table parsing

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::escape::decode_escapes;

/// Parse `sharedStrings.xml` into plain strings
///
/// Rich text runs are flattened into one string and phonetic runs are
/// dropped; only the text survives.
pub(super) fn read_shared_strings(data: &[u8], part: &str) -> XlsxResult<Vec<String>> {
    let mut xml_reader = Reader::from_reader(data);
    xml_reader.trim_text(false);

    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;
    let mut in_phonetic = false;

    loop {
        match xml_reader
            .read_event_into(&mut buf)
            .map_err(|e| XlsxError::xml(part, e))?
        {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"rPh" => in_phonetic = true,
                b"t" if in_si && !in_phonetic => in_t = true,
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Event::Text(e) if in_t => {
                let text = e.unescape().map_err(|e| XlsxError::xml(part, e))?;
                current.push_str(&text);
            }
            Event::CData(e) if in_t => {
                current.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(decode_escapes(&current).into_owned());
                    in_si = false;
                }
                b"rPh" => in_phonetic = false,
                b"t" => in_t = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    log::debug!("{}: {} shared strings", part, strings.len());
    Ok(strings)
}
