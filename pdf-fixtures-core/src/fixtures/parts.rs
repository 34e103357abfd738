//! Object graphs shared by several recipes

use crate::objects::{Dictionary, IndirectObject, Object, ObjectId, Stream};

pub(crate) fn id(number: u32) -> ObjectId {
    ObjectId::new(number, 0)
}

pub(crate) fn catalog_dict(pages: u32) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::name("Catalog"));
    dict.set("Pages", id(pages));
    dict
}

pub(crate) fn catalog(number: u32, pages: u32) -> IndirectObject {
    IndirectObject::dictionary(id(number), catalog_dict(pages))
}

pub(crate) fn pages(number: u32, kids: &[u32]) -> IndirectObject {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::name("Pages"));
    dict.set(
        "Kids",
        kids.iter().map(|&kid| Object::from(id(kid))).collect::<Vec<_>>(),
    );
    dict.set("Count", kids.len());
    IndirectObject::dictionary(id(number), dict)
}

/// US Letter page drawing with `/F1`
pub(crate) struct PageRefs {
    pub number: u32,
    pub parent: u32,
    pub contents: u32,
    pub font: u32,
    pub annots: Vec<u32>,
}

pub(crate) fn page(refs: &PageRefs) -> IndirectObject {
    let mut fonts = Dictionary::new();
    fonts.set("F1", id(refs.font));
    let mut resources = Dictionary::new();
    resources.set("Font", fonts);

    let mut dict = Dictionary::new();
    dict.set("Type", Object::name("Page"));
    dict.set("Parent", id(refs.parent));
    dict.set(
        "MediaBox",
        vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ],
    );
    dict.set("Contents", id(refs.contents));
    if !refs.annots.is_empty() {
        dict.set(
            "Annots",
            refs.annots
                .iter()
                .map(|&annot| Object::from(id(annot)))
                .collect::<Vec<_>>(),
        );
    }
    dict.set("Resources", resources);
    IndirectObject::dictionary(id(refs.number), dict)
}

pub(crate) fn helvetica(number: u32) -> IndirectObject {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::name("Font"));
    dict.set("Subtype", Object::name("Type1"));
    dict.set("BaseFont", Object::name("Helvetica"));
    IndirectObject::dictionary(id(number), dict)
}

/// Content stream showing `text` in 12pt `/F1` at (100, 700)
pub(crate) fn text_content(number: u32, text: &str) -> IndirectObject {
    let content = format!("BT\n/F1 12 Tf\n100 700 Td\n({text}) Tj\nET");
    IndirectObject::stream(id(number), Stream::new(content.into_bytes()))
}
