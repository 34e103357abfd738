//! PDF 1.5 fixtures indexed by cross-reference streams

use super::parts::{catalog, helvetica, id, page, pages, text_content, PageRefs};
use crate::error::Result;
use crate::objects::{IndirectObject, Stream};
use crate::writer::{ObjectStreamPacker, PdfBuilder, PdfVersion, Trailer, WriterConfig};

/// Five plain objects closed by a compressed cross-reference stream (object 6)
pub fn xref_stream(config: &WriterConfig) -> Result<Vec<u8>> {
    let mut builder = PdfBuilder::new(config.clone().with_version(PdfVersion::V1_5));

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

    builder.finish_with_xref_stream(id(6), Trailer::new(id(1)))?;
    Ok(builder.into_bytes())
}

/// Page tree, page and font packed into object stream 6. The catalog and the
/// content stream stay top-level; streams cannot be members.
pub fn compressed_object_stream(config: &WriterConfig) -> Result<Vec<u8>> {
    let mut builder = PdfBuilder::new(config.clone().with_version(PdfVersion::V1_5));

    let mut content = Stream::new(b"BT /F1 12 Tf 100 700 Td (Compressed) Tj ET".to_vec());
    content.compress_flate(config.compression_level)?;

    let mut packer = ObjectStreamPacker::new(id(6));
    packer
        .add(pages(2, &[3]))?
        .add(page(&PageRefs {
            number: 3,
            parent: 2,
            contents: 5,
            font: 4,
            annots: Vec::new(),
        }))?
        .add(helvetica(4))?;
    let packed = packer.pack(config.compression_level)?;

    builder.append_object(&catalog(1, 2))?;
    builder.append_object(&IndirectObject::stream(id(5), content))?;
    builder.append_object_stream(&packed)?;

    builder.finish_with_xref_stream(id(7), Trailer::new(id(1)))?;
    Ok(builder.into_bytes())
}
