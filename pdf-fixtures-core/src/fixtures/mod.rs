//! Fixture recipes
//!
//! Each recipe fixes an object graph and hands it to the writer layer, which
//! computes every offset, length and size. A recipe never writes a number it
//! did not measure.

mod classic;
mod compressed;
mod incremental;
mod linearized;
mod parts;

use crate::error::{PdfError, Result};
use crate::writer::WriterConfig;
use std::fmt;
use std::str::FromStr;

pub use classic::{annotation_text, bad_xref, flate_decode};
pub use compressed::{compressed_object_stream, xref_stream};
pub use incremental::incremental_update;
pub use linearized::linearized;

/// The fixtures this crate can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureKind {
    /// Compressed cross-reference stream instead of a classic table
    XRefStream,
    /// Linearization dictionary and hint stream up front
    Linearized,
    /// Dictionaries packed into an object stream, addressed by type-2 entries
    CompressedObjectStream,
    /// Flate-compressed page content
    FlateDecode,
    /// Page carrying a `/Text` annotation
    AnnotationText,
    /// `startxref` points past the end of the file
    BadXRef,
    /// Base revision plus one incremental update chained with `/Prev`
    IncrementalUpdate,
}

impl FixtureKind {
    pub const ALL: [FixtureKind; 7] = [
        FixtureKind::XRefStream,
        FixtureKind::Linearized,
        FixtureKind::CompressedObjectStream,
        FixtureKind::FlateDecode,
        FixtureKind::AnnotationText,
        FixtureKind::BadXRef,
        FixtureKind::IncrementalUpdate,
    ];

    /// Short name accepted on the command line
    pub fn name(self) -> &'static str {
        match self {
            FixtureKind::XRefStream => "xref-stream",
            FixtureKind::Linearized => "linearized",
            FixtureKind::CompressedObjectStream => "compressed-object-stream",
            FixtureKind::FlateDecode => "flatedecode",
            FixtureKind::AnnotationText => "annotation-text",
            FixtureKind::BadXRef => "bad-xref",
            FixtureKind::IncrementalUpdate => "issue3115",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            FixtureKind::XRefStream => "xref-stream.pdf",
            FixtureKind::Linearized => "linearized.pdf",
            FixtureKind::CompressedObjectStream => "compressed-object-stream.pdf",
            FixtureKind::FlateDecode => "flatedecode.pdf",
            FixtureKind::AnnotationText => "annotation-text.pdf",
            FixtureKind::BadXRef => "bad-xref.pdf",
            FixtureKind::IncrementalUpdate => "issue3115.pdf",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FixtureKind::XRefStream => "PDF 1.5 file indexed by a FlateDecode cross-reference stream",
            FixtureKind::Linearized => "single-page linearized file with a page offset hint stream",
            FixtureKind::CompressedObjectStream => {
                "page tree and font stored in an object stream, xref stream with type-2 entries"
            }
            FixtureKind::FlateDecode => "page content compressed with FlateDecode",
            FixtureKind::AnnotationText => "page with a /Text annotation",
            FixtureKind::BadXRef => "startxref points beyond the end of the file",
            FixtureKind::IncrementalUpdate => {
                "incremental update replacing the catalog and page content"
            }
        }
    }

    /// Whether the fixture is malformed on purpose
    pub fn is_malformed(self) -> bool {
        matches!(self, FixtureKind::BadXRef)
    }

    /// Build with the default writer configuration
    pub fn build(self) -> Result<Vec<u8>> {
        self.build_with(&WriterConfig::default())
    }

    /// Build with a caller-supplied configuration. Recipes pick their own
    /// header version; the rest of `config` is honored as given.
    pub fn build_with(self, config: &WriterConfig) -> Result<Vec<u8>> {
        let built = match self {
            FixtureKind::XRefStream => xref_stream(config),
            FixtureKind::Linearized => linearized(config),
            FixtureKind::CompressedObjectStream => compressed_object_stream(config),
            FixtureKind::FlateDecode => flate_decode(config),
            FixtureKind::AnnotationText => annotation_text(config),
            FixtureKind::BadXRef => bad_xref(config),
            FixtureKind::IncrementalUpdate => incremental_update(config),
        };

        match built {
            Ok(bytes) => {
                tracing::info!(fixture = self.file_name(), bytes = bytes.len(), "built fixture");
                Ok(bytes)
            }
            Err(source) => Err(PdfError::Fixture {
                fixture: self.file_name(),
                source: Box::new(source),
            }),
        }
    }
}

impl fmt::Display for FixtureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FixtureKind {
    type Err = PdfError;

    /// Accepts either the short name or the file name
    fn from_str(s: &str) -> Result<Self> {
        FixtureKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s || kind.file_name() == s)
            .ok_or_else(|| PdfError::UnknownFixture(s.to_string()))
    }
}
