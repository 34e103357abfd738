//! PDF writing functionality

mod builder;
mod config;
mod incremental;
mod object_stream;
pub mod serializer;
pub mod xref;

pub use builder::{Defect, PdfBuilder, RevisionInfo, Trailer};
pub use config::{PdfVersion, WriterConfig};
pub use incremental::IncrementalUpdate;
pub use object_stream::{ObjectStreamPacker, PackedObjectStream};
pub use serializer::{serialize_indirect, write_object_value};
pub use xref::{XRefEntry, XRefStreamWriter};
