//! # pdf-fixtures
//!
//! Byte-exact generator for small synthetic PDF files used to exercise PDF
//! readers: cross-reference streams, object streams, FlateDecode content,
//! annotations, linearization, incremental updates and a deliberately broken
//! `startxref`.
//!
//! Every byte offset, stream length and `/Size` in a generated file is
//! measured from the bytes actually written, so the files are valid except
//! where a fixture is malformed on purpose.
//!
//! ## Quick Start
//!
//! ```rust
//! use pdf_fixtures::{FixtureKind, Result};
//!
//! # fn main() -> Result<()> {
//! for kind in FixtureKind::ALL {
//!     let bytes = kind.build()?;
//!     assert!(bytes.starts_with(b"%PDF-"));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Building a file by hand
//!
//! ```rust
//! use pdf_fixtures::objects::{Dictionary, IndirectObject, Object, ObjectId};
//! use pdf_fixtures::writer::{PdfBuilder, Trailer, WriterConfig};
//!
//! # fn main() -> pdf_fixtures::Result<()> {
//! let mut catalog = Dictionary::new();
//! catalog.set("Type", Object::name("Catalog"));
//! catalog.set("Pages", ObjectId::new(2, 0));
//!
//! let mut pages = Dictionary::new();
//! pages.set("Type", Object::name("Pages"));
//! pages.set("Kids", Vec::<Object>::new());
//! pages.set("Count", 0);
//!
//! let mut builder = PdfBuilder::new(WriterConfig::default());
//! builder.append_object(&IndirectObject::dictionary(ObjectId::new(1, 0), catalog))?;
//! builder.append_object(&IndirectObject::dictionary(ObjectId::new(2, 0), pages))?;
//! builder.finish_with_table(Trailer::new(ObjectId::new(1, 0)))?;
//!
//! let bytes = builder.into_bytes();
//! assert!(bytes.ends_with(b"%%EOF\n"));
//! # Ok(())
//! # }
//! ```

pub mod compression;
pub mod error;
pub mod fixtures;
pub mod objects;
pub mod writer;

pub use error::{PdfError, Result};
pub use fixtures::FixtureKind;

/// Current version of pdf-fixtures
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
