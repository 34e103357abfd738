//! Linearized single-page fixture (ISO 32000-1 Annex F)
//!
//! Object order: linearization dictionary (1), catalog (2), hint stream (3),
//! first page objects (4 page, 5 content, 6 font), then the page tree (7) and
//! the main cross-reference table. The dictionary's `/L /H /E /T` values and
//! the hint table's offsets describe the file they sit in, so the recipe
//! rebuilds until the measured values equal the ones it wrote.

use super::parts::{catalog, helvetica, id, page, pages, text_content, PageRefs};
use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, IndirectObject, Object, Stream};
use crate::writer::{PdfBuilder, PdfVersion, Trailer, WriterConfig};

const FIRST_PAGE: u32 = 4;
const FIRST_PAGE_OBJECTS: u32 = 3;
const MAX_PASSES: usize = 8;

/// Length of the page offset hint table header; `/S` in the hint stream
const PAGE_OFFSET_HEADER_LEN: usize = 36;
const SHARED_OBJECT_HEADER_LEN: usize = 24;

/// Values that refer to positions inside the finished file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Layout {
    file_length: u64,
    hint_offset: u64,
    hint_length: u64,
    first_page_offset: u64,
    first_page_end: u64,
    main_xref_first_entry: u64,
}

pub fn linearized(config: &WriterConfig) -> Result<Vec<u8>> {
    let mut layout = Layout::default();

    for pass in 1..=MAX_PASSES {
        let (bytes, measured) = build(config, &layout)?;
        if measured == layout {
            tracing::debug!(pass, ?layout, "linearization values settled");
            return Ok(bytes);
        }
        layout = measured;
    }

    Err(PdfError::InvalidStructure(format!(
        "linearization values did not settle after {MAX_PASSES} passes"
    )))
}

fn build(config: &WriterConfig, layout: &Layout) -> Result<(Vec<u8>, Layout)> {
    let mut builder = PdfBuilder::new(config.clone().with_version(PdfVersion::V1_4));

    builder.append_object(&IndirectObject::dictionary(id(1), parameters(layout)))?;
    builder.append_object(&catalog(2, 7))?;

    let hint_offset = builder.append_object(&hint_stream(layout)?)?;
    let hint_length = builder.position() - hint_offset;

    let first_page_offset = builder.append_object(&page(&PageRefs {
        number: FIRST_PAGE,
        parent: 7,
        contents: 5,
        font: 6,
        annots: Vec::new(),
    }))?;
    builder.append_object(&text_content(5, "Linearized"))?;
    builder.append_object(&helvetica(6))?;
    let first_page_end = builder.position();

    builder.append_object(&pages(7, &[FIRST_PAGE]))?;
    let xref_offset = builder.finish_with_table(Trailer::new(id(2)))?;

    // "xref\n" then the "0 <size>\n" subsection header; /T names the EOL
    // that precedes the first entry
    let size = builder.revisions().last().map_or(0, |r| r.size);
    let subsection = format!("0 {size}\n");
    let main_xref_first_entry = xref_offset + "xref\n".len() as u64 + subsection.len() as u64 - 1;

    let bytes = builder.into_bytes();
    let measured = Layout {
        file_length: bytes.len() as u64,
        hint_offset,
        hint_length,
        first_page_offset,
        first_page_end,
        main_xref_first_entry,
    };
    Ok((bytes, measured))
}

fn parameters(layout: &Layout) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Linearized", 1);
    dict.set("L", layout.file_length);
    dict.set(
        "H",
        vec![
            Object::from(layout.hint_offset),
            Object::from(layout.hint_length),
        ],
    );
    dict.set("O", FIRST_PAGE);
    dict.set("E", layout.first_page_end);
    dict.set("N", 1);
    dict.set("T", layout.main_xref_first_entry);
    dict.set("P", 0);
    dict
}

/// Page offset hint table header followed by a shared object hint table
/// header. With one page and no shared objects every per-page field has zero
/// bits, so the headers are the whole table.
fn hint_stream(layout: &Layout) -> Result<IndirectObject> {
    let first_page_offset = hint_field("first page offset", layout.first_page_offset)?;
    let page_length = hint_field(
        "first page length",
        layout.first_page_end.saturating_sub(layout.first_page_offset),
    )?;

    let mut data = Vec::with_capacity(PAGE_OFFSET_HEADER_LEN + SHARED_OBJECT_HEADER_LEN);
    // page offset hint table
    push_u32(&mut data, FIRST_PAGE_OBJECTS);
    push_u32(&mut data, first_page_offset);
    push_u16(&mut data, 0);
    push_u32(&mut data, page_length);
    push_u16(&mut data, 0);
    push_u32(&mut data, 0);
    push_u16(&mut data, 0);
    push_u32(&mut data, 0);
    push_u16(&mut data, 0);
    push_u16(&mut data, 0);
    push_u16(&mut data, 0);
    push_u16(&mut data, 0);
    push_u16(&mut data, 0);
    // shared object hint table
    push_u32(&mut data, 0);
    push_u32(&mut data, 0);
    push_u32(&mut data, 0);
    push_u32(&mut data, 0);
    push_u16(&mut data, 0);
    push_u32(&mut data, 0);
    push_u16(&mut data, 0);

    let mut dict = Dictionary::new();
    dict.set("S", PAGE_OFFSET_HEADER_LEN);
    Ok(IndirectObject::stream(id(3), Stream::with_dictionary(dict, data)))
}

/// Hint table fields are 32 bits wide
fn hint_field(name: &str, value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        PdfError::InvalidStructure(format!("hint table {name} {value} does not fit in 32 bits"))
    })
}

fn push_u32(data: &mut Vec<u8>, value: u32) {
    data.extend_from_slice(&value.to_be_bytes());
}

fn push_u16(data: &mut Vec<u8>, value: u16) {
    data.extend_from_slice(&value.to_be_bytes());
}
