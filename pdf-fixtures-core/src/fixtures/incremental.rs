//! Two-revision fixture: a base file plus one incremental update

use super::parts::{catalog, catalog_dict, helvetica, id, page, pages, text_content, PageRefs};
use crate::error::Result;
use crate::objects::{IndirectObject, Object};
use crate::writer::{IncrementalUpdate, PdfBuilder, PdfVersion, Trailer, WriterConfig};

/// Base revision with five objects, then an update that rewrites the catalog
/// (adding `/Version`) and the page content. The update's table covers the
/// whole object range and its trailer chains back with `/Prev`.
pub fn incremental_update(config: &WriterConfig) -> Result<Vec<u8>> {
    let mut builder = PdfBuilder::new(config.clone().with_version(PdfVersion::V1_4));

    builder.append_object(&catalog(1, 2))?;
    builder.append_object(&pages(2, &[3]))?;
    builder.append_object(&page(&PageRefs {
        number: 3,
        parent: 2,
        contents: 4,
        font: 5,
        annots: Vec::new(),
    }))?;
    builder.append_object(&text_content(4, "Original"))?;
    builder.append_object(&helvetica(5))?;
    builder.finish_with_table(Trailer::new(id(1)))?;

    let mut update = IncrementalUpdate::new(builder)?;
    update.update_object(&versioned_catalog())?;
    update.update_object(&text_content(4, "Updated"))?;
    let builder = update.finish_with_table(Trailer::new(id(1)))?;

    Ok(builder.into_bytes())
}

fn versioned_catalog() -> IndirectObject {
    let mut dict = catalog_dict(2);
    dict.set("Version", Object::name("1.4"));
    IndirectObject::dictionary(id(1), dict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_revisions_with_prev() {
        let bytes = incremental_update(&WriterConfig::default()).unwrap();
        let pdf = String::from_utf8_lossy(&bytes);

        assert_eq!(pdf.matches("%%EOF\n").count(), 2);
        assert_eq!(pdf.matches("\nxref\n0 6\n").count(), 2);

        let first_xref = pdf.find("\nxref\n").unwrap() + 1;
        assert!(pdf.contains(&format!("trailer\n<< /Size 6 /Root 1 0 R /Prev {first_xref} >>\n")));
    }

    #[test]
    fn test_update_follows_base_eof() {
        let bytes = incremental_update(&WriterConfig::default()).unwrap();
        let pdf = String::from_utf8_lossy(&bytes);

        let base_end = pdf.find("%%EOF\n").unwrap() + "%%EOF\n".len();
        assert!(pdf[base_end..].starts_with(
            "1 0 obj\n<< /Type /Catalog /Pages 2 0 R /Version /1.4 >>\nendobj\n"
        ));
        assert!(pdf[base_end..].contains("(Updated) Tj"));
        assert!(pdf[..base_end].contains("(Original) Tj"));
    }
}
