// XML document format for preferences.
//
// <r-prefs version="1.0">
//   <pref><name>forms-main_x</name><value>120</value></pref>
//   ...
// </r-prefs>
//
// Parsing is tolerant per entry: a <pref> missing its name or value is
// logged and skipped, loading continues. Only a document that is not
// well-formed, or that has no recognizable root element, is an error.

use std::fmt;
use std::io;

use quick_xml::events::{BytesDecl, BytesEnd, BytesRef, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::PrefError;

const ROOT_TAG: &str = "r-prefs";
const FORMAT_VERSION: &str = "1.0";

/// Characters stripped from both ends of loaded names and values.
const TRIM: &[char] = &[' ', '\n', '\r', '\t', '\x0c'];

pub(crate) fn trim_entry(s: &str) -> &str {
    s.trim_matches(TRIM)
}

#[derive(Clone, Copy)]
enum Field {
    Name,
    Value,
}

/// Extracts the name/value pairs of every `<pref>` entry, in document
/// order. Duplicate names are not collapsed here; the store's upsert
/// gives later entries precedence.
pub(crate) fn parse_entries(xml: &str) -> Result<Vec<(String, String)>, PrefError> {
    let mut reader = Reader::from_str(xml);
    // Escaped characters split the surrounding text into separate
    // events; trimming each fragment would eat the spaces next to
    // every reference. Whitespace around whole names and values is
    // trimmed by the store instead.
    reader.config_mut().trim_text(false);

    let mut entries = Vec::new();
    let mut saw_root = false;
    let mut in_pref = false;
    let mut field: Option<Field> = None;
    let mut name: Option<String> = None;
    let mut value: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                tag if !saw_root => {
                    if tag != ROOT_TAG.as_bytes() {
                        return Err(PrefError::Parse(format!(
                            "unrecognized root element {:?}",
                            String::from_utf8_lossy(tag)
                        )));
                    }
                    saw_root = true;
                }
                b"pref" => {
                    in_pref = true;
                    name = None;
                    value = None;
                }
                b"name" if in_pref => {
                    name = Some(String::new());
                    field = Some(Field::Name);
                }
                b"value" if in_pref => {
                    value = Some(String::new());
                    field = Some(Field::Value);
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                // A self-closing <r-prefs/> is a valid, empty document.
                tag if !saw_root => {
                    if tag != ROOT_TAG.as_bytes() {
                        return Err(PrefError::Parse(format!(
                            "unrecognized root element {:?}",
                            String::from_utf8_lossy(tag)
                        )));
                    }
                    saw_root = true;
                }
                b"pref" => log::warn!("skipping pref entry without name/value"),
                b"name" if in_pref => name = Some(String::new()),
                b"value" if in_pref => value = Some(String::new()),
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if let Some(target) = active_field(field, &mut name, &mut value) {
                    match e.xml_content() {
                        Ok(text) => target.push_str(&text),
                        Err(err) => log::warn!("skipping unreadable pref text: {err}"),
                    }
                }
            }
            // Escaped characters arrive as separate reference events.
            Ok(Event::GeneralRef(ref e)) => {
                if let Some(target) = active_field(field, &mut name, &mut value) {
                    if let Some(text) = resolve_reference(e) {
                        target.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"pref" => {
                    in_pref = false;
                    match (name.take(), value.take()) {
                        (Some(n), Some(v)) => entries.push((n, v)),
                        _ => log::warn!("skipping pref entry without name/value"),
                    }
                }
                b"name" | b"value" => field = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(PrefError::Parse(err.to_string())),
        }
        buf.clear();
    }

    if !saw_root {
        return Err(PrefError::Parse(format!("missing <{ROOT_TAG}> root element")));
    }

    Ok(entries)
}

/// The buffer the current text or reference event belongs to, if any.
fn active_field<'a>(
    field: Option<Field>,
    name: &'a mut Option<String>,
    value: &'a mut Option<String>,
) -> Option<&'a mut String> {
    match field {
        Some(Field::Name) => name.as_mut(),
        Some(Field::Value) => value.as_mut(),
        None => None,
    }
}

/// Resolves a character reference or one of the five predefined XML
/// entities. Anything else is logged and dropped, in keeping with the
/// per-entry tolerance of the loader.
fn resolve_reference(reference: &BytesRef) -> Option<String> {
    match reference.resolve_char_ref() {
        Ok(Some(ch)) => return Some(ch.to_string()),
        Ok(None) => {}
        Err(err) => {
            log::warn!("skipping unreadable reference: {err}");
            return None;
        }
    }

    let text = match &**reference {
        b"lt" => "<",
        b"gt" => ">",
        b"amp" => "&",
        b"apos" => "'",
        b"quot" => "\"",
        other => {
            log::warn!(
                "skipping unknown entity &{};",
                String::from_utf8_lossy(other)
            );
            return None;
        }
    };
    Some(text.to_string())
}

/// Writes the full document for the given entries, in iteration order.
pub(crate) fn write_entries<'a, W, I>(out: W, entries: I) -> Result<(), PrefError>
where
    W: io::Write,
    I: Iterator<Item = (&'a str, &'a str)>,
{
    let mut writer = Writer::new_with_indent(out, b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(write_err)?;

    let mut root = BytesStart::new(ROOT_TAG);
    root.push_attribute(("version", FORMAT_VERSION));
    writer.write_event(Event::Start(root)).map_err(write_err)?;

    for (name, value) in entries {
        writer
            .write_event(Event::Start(BytesStart::new("pref")))
            .map_err(write_err)?;
        write_text_element(&mut writer, "name", name)?;
        write_text_element(&mut writer, "value", value)?;
        writer
            .write_event(Event::End(BytesEnd::new("pref")))
            .map_err(write_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(ROOT_TAG)))
        .map_err(write_err)?;
    Ok(())
}

fn write_text_element<W: io::Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> Result<(), PrefError> {
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(write_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(write_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(write_err)?;
    Ok(())
}

fn write_err(err: impl fmt::Display) -> PrefError {
    PrefError::Io(err.to_string())
}
