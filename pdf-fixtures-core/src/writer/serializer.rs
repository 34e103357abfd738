//! Byte-exact serialization of PDF values and indirect objects
//!
//! An indirect object is written as
//! `"<num> <gen> obj\n<body>\n[stream\n<payload>\nendstream\n]endobj\n"`.
//! Dictionaries stay on one line (`<< /Key value >>`) so offsets inside a
//! fixture are easy to reason about when reading it in a hex dump.

use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, IndirectObject, Object, ObjectBody, Stream};
use std::io::Write;

/// Write a direct value
pub fn write_object_value<W: Write>(writer: &mut W, object: &Object) -> Result<()> {
    match object {
        Object::Null => writer.write_all(b"null")?,
        Object::Boolean(b) => writer.write_all(if *b { &b"true"[..] } else { &b"false"[..] })?,
        Object::Integer(i) => write!(writer, "{i}")?,
        Object::Real(f) => {
            if !f.is_finite() {
                return Err(PdfError::InvalidStructure(format!(
                    "real number {f} has no PDF representation"
                )));
            }
            let formatted = format!("{f:.6}");
            let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
            let trimmed = if trimmed == "-0" { "0" } else { trimmed };
            writer.write_all(trimmed.as_bytes())?;
        }
        Object::String(s) => {
            writer.write_all(b"(")?;
            writer.write_all(escape_literal_string(s).as_bytes())?;
            writer.write_all(b")")?;
        }
        Object::Name(n) => {
            writer.write_all(b"/")?;
            writer.write_all(escape_name(n).as_bytes())?;
        }
        Object::Array(arr) => {
            writer.write_all(b"[")?;
            for (i, obj) in arr.iter().enumerate() {
                if i > 0 {
                    writer.write_all(b" ")?;
                }
                write_object_value(writer, obj)?;
            }
            writer.write_all(b"]")?;
        }
        Object::Dictionary(dict) => write_dictionary(writer, dict)?,
        Object::Reference(id) => write!(writer, "{} {} R", id.number(), id.generation())?,
    }
    Ok(())
}

fn write_dictionary<W: Write>(writer: &mut W, dict: &Dictionary) -> Result<()> {
    writer.write_all(b"<<")?;
    for (key, value) in dict.iter() {
        writer.write_all(b" /")?;
        writer.write_all(escape_name(key).as_bytes())?;
        writer.write_all(b" ")?;
        write_object_value(writer, value)?;
    }
    writer.write_all(b" >>")?;
    Ok(())
}

/// Serialize a complete indirect object, header through `endobj`.
///
/// Fails with [`PdfError::LengthMismatch`] when a stream's declared `/Length`
/// differs from its payload.
pub fn serialize_indirect(object: &IndirectObject) -> Result<Vec<u8>> {
    let id = object.id();
    let mut out = Vec::new();
    writeln!(out, "{} {} obj", id.number(), id.generation())?;

    match object.body() {
        ObjectBody::Direct(value) => {
            write_object_value(&mut out, value)?;
            out.push(b'\n');
        }
        ObjectBody::Stream(stream) => {
            let dict = checked_stream_dictionary(object, stream)?;
            write_dictionary(&mut out, &dict)?;
            out.extend_from_slice(b"\nstream\n");
            out.extend_from_slice(stream.data());
            out.extend_from_slice(b"\nendstream\n");
        }
    }

    out.extend_from_slice(b"endobj\n");
    Ok(out)
}

/// Serialize only the value of a non-stream object, as stored inside an
/// object stream (no `obj`/`endobj` wrapper).
pub fn serialize_body(object: &IndirectObject) -> Result<Vec<u8>> {
    match object.body() {
        ObjectBody::Direct(value) => {
            let mut out = Vec::new();
            write_object_value(&mut out, value)?;
            Ok(out)
        }
        ObjectBody::Stream(_) => Err(PdfError::InvalidObjectStreamMember(
            object.id(),
            "stream objects cannot be stored in an object stream".to_string(),
        )),
    }
}

fn checked_stream_dictionary(object: &IndirectObject, stream: &Stream) -> Result<Dictionary> {
    let actual = stream.data().len();
    let mut dict = stream.dictionary().clone();

    match stream.declared_length() {
        Some(declared) if declared != actual as i64 => {
            return Err(PdfError::LengthMismatch {
                object: object.id(),
                declared,
                actual,
            });
        }
        Some(_) => {}
        None => dict.set("Length", actual),
    }

    if contains(stream.data(), b"endstream") {
        tracing::warn!(
            object = %object.id(),
            "stream payload contains 'endstream'; readers that ignore /Length will truncate it"
        );
    }

    Ok(dict)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Escape special characters in PDF literal strings
fn escape_literal_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Names use `#xx` for delimiters, whitespace and bytes outside `!`..`~`
fn escape_name(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for byte in name.bytes() {
        let is_delimiter = matches!(
            byte,
            b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' | b'#'
        );
        if (b'!'..=b'~').contains(&byte) && !is_delimiter {
            escaped.push(byte as char);
        } else {
            escaped.push_str(&format!("#{byte:02X}"));
        }
    }
    escaped
}
