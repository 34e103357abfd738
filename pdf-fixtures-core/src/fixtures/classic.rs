//! Single-revision fixtures with a classic cross-reference table

use super::parts::{catalog, helvetica, id, page, pages, text_content, PageRefs};
use crate::error::Result;
use crate::objects::{Dictionary, IndirectObject, Object, Stream};
use crate::writer::{Defect, PdfBuilder, PdfVersion, Trailer, WriterConfig};

/// Decoded page content of `flatedecode.pdf`
pub(crate) const FLATE_CONTENT: &str = "BT /F1 12 Tf 100 700 Td (FlateDecode) Tj ET";

/// One page whose content stream is stored with `/Filter /FlateDecode`
pub fn flate_decode(config: &WriterConfig) -> Result<Vec<u8>> {
    let mut builder = PdfBuilder::new(config.clone().with_version(PdfVersion::V1_4));

    let mut content = Stream::new(FLATE_CONTENT.as_bytes().to_vec());
    content.compress_flate(config.compression_level)?;

    builder.append_object(&catalog(1, 2))?;
    builder.append_object(&pages(2, &[3]))?;
    builder.append_object(&page(&PageRefs {
        number: 3,
        parent: 2,
        contents: 4,
        font: 5,
        annots: Vec::new(),
    }))?;
    builder.append_object(&IndirectObject::stream(id(4), content))?;
    builder.append_object(&helvetica(5))?;

    builder.finish_with_table(Trailer::new(id(1)))?;
    Ok(builder.into_bytes())
}

/// One page with a `/Text` annotation referenced from `/Annots`
pub fn annotation_text(config: &WriterConfig) -> Result<Vec<u8>> {
    let mut builder = PdfBuilder::new(config.clone().with_version(PdfVersion::V1_4));

    let mut annotation = Dictionary::new();
    annotation.set("Type", Object::name("Annot"));
    annotation.set("Subtype", Object::name("Text"));
    annotation.set(
        "Rect",
        vec![
            Object::Integer(100),
            Object::Integer(700),
            Object::Integer(200),
            Object::Integer(750),
        ],
    );
    annotation.set("Contents", "This is a text annotation");
    annotation.set("T", "Note");

    builder.append_object(&catalog(1, 2))?;
    builder.append_object(&pages(2, &[3]))?;
    builder.append_object(&page(&PageRefs {
        number: 3,
        parent: 2,
        contents: 5,
        font: 6,
        annots: vec![4],
    }))?;
    builder.append_object(&IndirectObject::dictionary(id(4), annotation))?;
    builder.append_object(&text_content(5, "Page with annotation"))?;
    builder.append_object(&helvetica(6))?;

    builder.finish_with_table(Trailer::new(id(1)))?;
    Ok(builder.into_bytes())
}

/// A well-formed file except that `startxref` names an offset past EOF.
/// The table itself is correct, so a reader that scans for `xref` recovers.
pub fn bad_xref(config: &WriterConfig) -> Result<Vec<u8>> {
    let mut builder = PdfBuilder::new(config.clone().with_version(PdfVersion::V1_4));
    builder.set_defect(Defect::StartXrefBeyondEof)?;

    builder.append_object(&catalog(1, 2))?;
    builder.append_object(&pages(2, &[3]))?;
    builder.append_object(&page(&PageRefs {
        number: 3,
        parent: 2,
        contents: 4,
        font: 5,
        annots: Vec::new(),
    }))?;
    builder.append_object(&text_content(4, "Test"))?;
    builder.append_object(&helvetica(5))?;

    builder.finish_with_table(Trailer::new(id(1)))?;
    Ok(builder.into_bytes())
}
