//! Incremental updates (ISO 32000-1 §7.5.6)
//!
//! An update appends changed objects after the base revision's `%%EOF` and
//! closes with a cross-reference section covering the full object range.
//! Entries for unchanged objects still point into the base revision, and the
//! trailer's `/Prev` is the base revision's computed cross-reference offset.

use crate::error::{PdfError, Result};
use crate::objects::IndirectObject;
use crate::writer::builder::{PdfBuilder, RevisionInfo, Trailer};

/// Appends one revision on top of a builder whose latest revision is closed
#[derive(Debug)]
pub struct IncrementalUpdate {
    builder: PdfBuilder,
    base: RevisionInfo,
    changed: Vec<u32>,
}

impl IncrementalUpdate {
    /// Begin an update. Fails if the builder has no closed revision or has
    /// objects appended after it.
    pub fn new(builder: PdfBuilder) -> Result<Self> {
        let base = *builder.revisions().last().ok_or_else(|| {
            PdfError::InvalidStructure(
                "an incremental update needs a finished base revision".to_string(),
            )
        })?;
        if builder.position() != base.end {
            return Err(PdfError::InvalidStructure(format!(
                "{} bytes written after the base revision's %%EOF",
                builder.position() - base.end
            )));
        }

        Ok(Self {
            builder,
            base,
            changed: Vec::new(),
        })
    }

    /// Append a new definition of an object. Reusing an existing object
    /// number supersedes the earlier definition for readers that scan
    /// revisions newest first.
    pub fn update_object(&mut self, object: &IndirectObject) -> Result<u64> {
        let number = object.id().number();
        let supersedes = self.builder.entries().contains_key(&number);
        let offset = self.builder.append_object(object)?;
        self.changed.push(number);

        tracing::debug!(object = %object.id(), offset, supersedes, "updated object");
        Ok(offset)
    }

    /// Object numbers written by this update, in order
    pub fn changed(&self) -> &[u32] {
        &self.changed
    }

    /// Close the update with a classic table whose trailer carries `/Prev`.
    /// Returns the builder so further updates can be chained.
    pub fn finish_with_table(mut self, trailer: Trailer) -> Result<PdfBuilder> {
        if self.changed.is_empty() {
            return Err(PdfError::InvalidStructure(
                "an incremental update must change at least one object".to_string(),
            ));
        }

        let xref_offset = self.builder.finish_with_table(trailer)?;
        tracing::info!(
            prev = self.base.xref_offset,
            xref_offset,
            changed = ?self.changed,
            "chained incremental update"
        );
        Ok(self.builder)
    }
}
