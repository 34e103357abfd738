use crate::objects::ObjectId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Compression error: {0}")]
    CompressionError(String),

    #[error("Invalid PDF structure: {0}")]
    InvalidStructure(String),

    #[error("Declared /Length {declared} of object {object} does not match payload length {actual}")]
    LengthMismatch {
        object: ObjectId,
        declared: i64,
        actual: usize,
    },

    #[error("Recorded offset {recorded} of object {object} does not point at its 'obj' token")]
    OffsetMismatch { object: u32, recorded: u64 },

    #[error("Trailer /Size {declared} does not equal highest object number + 1 ({expected})")]
    SizeMismatch { declared: i64, expected: u32 },

    #[error("Object number {0} defined twice in one revision")]
    DuplicateObject(u32),

    #[error("Object {0} cannot be packed into an object stream: {1}")]
    InvalidObjectStreamMember(ObjectId, String),

    #[error("Unknown fixture: {0}")]
    UnknownFixture(String),

    #[error("Fixture '{fixture}' failed: {source}")]
    Fixture {
        fixture: &'static str,
        #[source]
        source: Box<PdfError>,
    },
}

pub type Result<T> = std::result::Result<T, PdfError>;
