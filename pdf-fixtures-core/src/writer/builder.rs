//! Document assembly
//!
//! [`PdfBuilder`] owns the output buffer and the running byte position. Every
//! object is appended through it, so the offset recorded for an object is by
//! construction the position its `N G obj` token was written at. Before a
//! revision is closed the builder re-checks that against the buffer anyway;
//! a fixture that fails the check is never returned.

use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, IndirectObject, Object, ObjectId};
use crate::writer::config::WriterConfig;
use crate::writer::object_stream::PackedObjectStream;
use crate::writer::serializer::{serialize_indirect, write_object_value};
use crate::writer::xref::{table_size, write_xref_table, XRefEntry, XRefStreamWriter};
use std::collections::{BTreeMap, BTreeSet};

/// Trailer entries supplied by a recipe. `/Size` and `/Prev` are computed by
/// the builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Trailer {
    root: ObjectId,
    info: Option<ObjectId>,
    extra: Dictionary,
}

impl Trailer {
    pub fn new(root: ObjectId) -> Self {
        Self {
            root,
            info: None,
            extra: Dictionary::new(),
        }
    }

    pub fn with_info(mut self, info: ObjectId) -> Self {
        self.info = Some(info);
        self
    }

    /// Additional trailer key. A `/Size` given here must agree with the
    /// computed value.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Object>) -> Self {
        self.extra.set(key, value);
        self
    }

    pub fn root(&self) -> ObjectId {
        self.root
    }
}

/// A deliberate, single defect injected into one revision so a parser's
/// recovery path can be tested. Every other contract stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Defect {
    /// `startxref` names an offset past the end of the file
    StartXrefBeyondEof,
    /// Every in-use entry of the written table is shifted by `shift` bytes
    StaleOffsets { shift: u64 },
    /// `/Size` is one less than the highest object number + 1
    UnderstatedSize,
}

/// Where a finished revision put its cross-reference section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionInfo {
    /// Byte offset of the `xref` keyword or the xref stream's `obj` token
    pub xref_offset: u64,
    /// Value written after `startxref` (differs only under a defect)
    pub startxref: u64,
    /// Declared `/Size`
    pub size: u32,
    /// Buffer length once `%%EOF\n` was written
    pub end: u64,
    /// Whether the section is a cross-reference stream
    pub xref_stream: bool,
}

/// Assembles one or more revisions into a single byte buffer
#[derive(Debug)]
pub struct PdfBuilder {
    buffer: Vec<u8>,
    config: WriterConfig,
    /// Cross-reference entries, carried forward across revisions
    entries: BTreeMap<u32, XRefEntry>,
    /// Object numbers defined by the open revision
    defined: BTreeSet<u32>,
    revisions: Vec<RevisionInfo>,
    defect: Option<Defect>,
}

impl PdfBuilder {
    /// Start a document, writing the `%PDF-x.y` header
    pub fn new(config: WriterConfig) -> Self {
        let mut buffer = format!("%PDF-{}\n", config.pdf_version).into_bytes();
        if config.binary_marker {
            buffer.extend_from_slice(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n']);
        }

        let mut entries = BTreeMap::new();
        entries.insert(0, XRefEntry::FREE_HEAD);

        Self {
            buffer,
            config,
            entries,
            defined: BTreeSet::new(),
            revisions: Vec::new(),
            defect: None,
        }
    }

    /// Current byte position, i.e. the offset the next object will get
    pub fn position(&self) -> u64 {
        self.buffer.len() as u64
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Finished revisions, oldest first
    pub fn revisions(&self) -> &[RevisionInfo] {
        &self.revisions
    }

    /// Current cross-reference entries
    pub fn entries(&self) -> &BTreeMap<u32, XRefEntry> {
        &self.entries
    }

    /// Inject a defect into the open revision. Only one per revision.
    pub fn set_defect(&mut self, defect: Defect) -> Result<()> {
        if let Some(existing) = self.defect {
            return Err(PdfError::InvalidStructure(format!(
                "revision already carries defect {existing:?}"
            )));
        }
        self.defect = Some(defect);
        Ok(())
    }

    /// Serialize and append an object; returns the offset it was written at
    pub fn append_object(&mut self, object: &IndirectObject) -> Result<u64> {
        let id = object.id();
        let bytes = serialize_indirect(object)?;
        self.claim(id.number())?;

        let offset = self.position();
        self.buffer.extend_from_slice(&bytes);
        self.entries.insert(
            id.number(),
            XRefEntry::InUse {
                offset,
                generation: id.generation(),
            },
        );

        tracing::debug!(object = %id, offset, len = bytes.len(), "appended object");
        Ok(offset)
    }

    /// Append an object stream container and register its members as
    /// compressed entries
    pub fn append_object_stream(&mut self, packed: &PackedObjectStream) -> Result<u64> {
        if !self.config.pdf_version.supports_xref_streams() {
            return Err(PdfError::InvalidStructure(format!(
                "object streams need PDF 1.5, header declares {}",
                self.config.pdf_version
            )));
        }

        for &(number, _) in packed.members() {
            self.ensure_unclaimed(number)?;
        }

        let offset = self.append_object(packed.container())?;
        let container = packed.container_id().number();
        for &(number, index) in packed.members() {
            self.claim(number)?;
            self.entries.insert(
                number,
                XRefEntry::Compressed {
                    stream_object_number: container,
                    index_within_stream: index,
                },
            );
        }
        Ok(offset)
    }

    /// Close the revision with a classic `xref` table and `trailer`.
    /// Returns the offset of the `xref` keyword.
    pub fn finish_with_table(&mut self, trailer: Trailer) -> Result<u64> {
        let table_len = table_size(&self.entries);
        let size = self.declared_size(&trailer, table_len)?;
        self.verify(&trailer)?;

        let xref_offset = self.position();
        let written = self.written_entries()?;

        // an understated /Size only touches the trailer, never the table
        let mut section = Vec::new();
        write_xref_table(&mut section, &written, table_len)?;
        section.extend_from_slice(b"trailer\n");
        write_object_value(&mut section, &Object::Dictionary(self.trailer_dict(&trailer, size)))?;
        section.push(b'\n');
        self.buffer.extend_from_slice(&section);

        self.close_revision(xref_offset, size, false)?;
        Ok(xref_offset)
    }

    /// Close the revision with a compressed cross-reference stream whose
    /// dictionary doubles as the trailer. Returns the stream's offset.
    pub fn finish_with_xref_stream(&mut self, stream_id: ObjectId, trailer: Trailer) -> Result<u64> {
        if !self.config.pdf_version.supports_xref_streams() {
            return Err(PdfError::InvalidStructure(format!(
                "cross-reference streams need PDF 1.5, header declares {}",
                self.config.pdf_version
            )));
        }

        let number = stream_id.number();
        self.ensure_unclaimed(number)?;
        let table_len = table_size(&self.entries).max(number.saturating_add(1));
        let size = self.declared_size(&trailer, table_len)?;
        self.verify(&trailer)?;

        // nothing is recorded until every check above has passed
        self.claim(number)?;
        let xref_offset = self.position();
        self.entries.insert(
            number,
            XRefEntry::InUse {
                offset: xref_offset,
                generation: stream_id.generation(),
            },
        );

        let mut writer = XRefStreamWriter::new(stream_id);
        for (&number, &entry) in &self.written_entries()? {
            writer.add_entry(number, entry);
        }
        let dict = self.trailer_dict(&trailer, size);
        let object = writer.build_object(&dict, self.config.compression_level)?;
        let bytes = serialize_indirect(&object)?;
        self.buffer.extend_from_slice(&bytes);
        self.check_offset(stream_id.number())?;

        self.close_revision(xref_offset, size, true)?;
        Ok(xref_offset)
    }

    fn ensure_unclaimed(&self, number: u32) -> Result<()> {
        if number == 0 {
            return Err(PdfError::InvalidStructure(
                "object 0 is reserved for the free list head".to_string(),
            ));
        }
        if self.defined.contains(&number) {
            return Err(PdfError::DuplicateObject(number));
        }
        Ok(())
    }

    fn claim(&mut self, number: u32) -> Result<()> {
        self.ensure_unclaimed(number)?;
        self.defined.insert(number);
        Ok(())
    }

    /// `/Size` to write into the trailer, given the table length `expected`
    fn declared_size(&self, trailer: &Trailer, expected: u32) -> Result<u32> {
        if let Some(declared) = trailer.extra.get("Size").and_then(Object::as_integer) {
            if declared != i64::from(expected) {
                return Err(PdfError::SizeMismatch { declared, expected });
            }
        }
        Ok(match self.defect {
            Some(Defect::UnderstatedSize) => expected - 1,
            _ => expected,
        })
    }

    /// Offsets must land on their `obj` tokens and trailer references must
    /// resolve through the table
    fn verify(&self, trailer: &Trailer) -> Result<()> {
        for &number in self.entries.keys() {
            self.check_offset(number)?;
        }

        for (key, id) in [("Root", Some(trailer.root)), ("Info", trailer.info)] {
            if let Some(id) = id {
                if matches!(self.entries.get(&id.number()), None | Some(XRefEntry::Free { .. })) {
                    return Err(PdfError::InvalidStructure(format!(
                        "trailer /{key} {id} has no cross-reference entry"
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_offset(&self, number: u32) -> Result<()> {
        let Some(XRefEntry::InUse { offset, generation }) = self.entries.get(&number).copied()
        else {
            return Ok(());
        };

        let token = format!("{number} {generation} obj");
        let start = offset as usize;
        let at_line_start = start > 0 && matches!(self.buffer.get(start - 1), Some(b'\n' | b'\r'));
        let on_token = self
            .buffer
            .get(start..)
            .is_some_and(|rest| rest.starts_with(token.as_bytes()));
        if !at_line_start || !on_token {
            return Err(PdfError::OffsetMismatch {
                object: number,
                recorded: offset,
            });
        }
        Ok(())
    }

    /// Entries as they go into the file, after applying a stale-offset defect
    fn written_entries(&self) -> Result<BTreeMap<u32, XRefEntry>> {
        let Some(Defect::StaleOffsets { shift }) = self.defect else {
            return Ok(self.entries.clone());
        };

        self.entries
            .iter()
            .map(|(&number, &entry)| {
                let entry = match entry {
                    XRefEntry::InUse { offset, generation } => XRefEntry::InUse {
                        offset: offset.checked_add(shift).ok_or_else(|| {
                            PdfError::InvalidStructure(format!(
                                "stale offset shift {shift} overflows object {number}"
                            ))
                        })?,
                        generation,
                    },
                    other => other,
                };
                Ok((number, entry))
            })
            .collect()
    }

    fn trailer_dict(&self, trailer: &Trailer, size: u32) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Size", size);
        dict.set("Root", trailer.root);
        if let Some(info) = trailer.info {
            dict.set("Info", info);
        }
        for (key, value) in trailer.extra.iter() {
            if key != "Size" {
                dict.set(key.clone(), value.clone());
            }
        }
        if let Some(previous) = self.revisions.last() {
            dict.set("Prev", previous.xref_offset);
        }
        dict
    }

    fn close_revision(&mut self, xref_offset: u64, size: u32, xref_stream: bool) -> Result<()> {
        let startxref = match self.defect {
            // Comfortably past anything the short tail below can add
            Some(Defect::StartXrefBeyondEof) => (self.position() + 64) * 10,
            _ => xref_offset,
        };

        self.buffer
            .extend_from_slice(format!("startxref\n{startxref}\n%%EOF\n").as_bytes());
        let end = self.position();

        if matches!(self.defect, Some(Defect::StartXrefBeyondEof)) && startxref <= end {
            return Err(PdfError::InvalidStructure(format!(
                "startxref {startxref} was meant to point past EOF at {end}"
            )));
        }

        let revision = RevisionInfo {
            xref_offset,
            startxref,
            size,
            end,
            xref_stream,
        };
        tracing::info!(
            revision = self.revisions.len(),
            xref_offset,
            size,
            xref_stream,
            defect = ?self.defect,
            "closed revision"
        );

        self.revisions.push(revision);
        self.defined.clear();
        self.defect = None;
        Ok(())
    }
}
