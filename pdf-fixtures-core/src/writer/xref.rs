//! Cross-reference section encoders
//!
//! Two variants: the classic text table (ISO 32000-1 §7.5.4) and the
//! compressed cross-reference stream of PDF 1.5+ (ISO 32000-1 §7.5.8).

use crate::compression;
use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, IndirectObject, Object, ObjectId, Stream};
use std::collections::BTreeMap;
use std::io::Write;

/// Cross-reference entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XRefEntry {
    /// Free object entry
    Free {
        /// Next free object number
        next_free_object: u32,
        /// Generation number
        generation: u16,
    },
    /// In-use object entry
    InUse {
        /// Byte offset in the file
        offset: u64,
        /// Generation number
        generation: u16,
    },
    /// Compressed object entry (PDF 1.5+)
    Compressed {
        /// Object number of the object stream containing this object
        stream_object_number: u32,
        /// Index of this object within the object stream
        index_within_stream: u32,
    },
}

impl XRefEntry {
    /// Head of the free list, always object 0
    pub const FREE_HEAD: XRefEntry = XRefEntry::Free {
        next_free_object: 0,
        generation: 65535,
    };

    /// Binary record fields `[type, field2, field3]` for a cross-reference stream
    pub fn fields(&self) -> [u64; 3] {
        match *self {
            XRefEntry::Free {
                next_free_object,
                generation,
            } => [0, next_free_object as u64, generation as u64],
            XRefEntry::InUse { offset, generation } => [1, offset, generation as u64],
            XRefEntry::Compressed {
                stream_object_number,
                index_within_stream,
            } => [2, stream_object_number as u64, index_within_stream as u64],
        }
    }

    /// The fixed 20-byte classic table line, `nnnnnnnnnn ggggg n \n`
    pub fn table_line(&self) -> Result<String> {
        match *self {
            XRefEntry::Free {
                next_free_object,
                generation,
            } => Ok(format!("{next_free_object:010} {generation:05} f \n")),
            XRefEntry::InUse { offset, generation } => {
                if offset > 9_999_999_999 {
                    return Err(PdfError::InvalidStructure(format!(
                        "offset {offset} does not fit a 10-digit xref field"
                    )));
                }
                Ok(format!("{offset:010} {generation:05} n \n"))
            }
            XRefEntry::Compressed { .. } => Err(PdfError::InvalidStructure(
                "compressed entries need a cross-reference stream".to_string(),
            )),
        }
    }
}

/// `/Size` for a set of entries: highest object number + 1
pub fn table_size(entries: &BTreeMap<u32, XRefEntry>) -> u32 {
    entries.keys().next_back().map_or(1, |max| max + 1)
}

/// Write a classic `xref` table covering `0..size` as a single subsection.
///
/// Object numbers without an entry are written as free entries so the range
/// stays contiguous.
pub fn write_xref_table<W: Write>(
    writer: &mut W,
    entries: &BTreeMap<u32, XRefEntry>,
    size: u32,
) -> Result<()> {
    writer.write_all(b"xref\n")?;
    writeln!(writer, "0 {size}")?;

    for number in 0..size {
        let entry = match entries.get(&number) {
            Some(entry) => *entry,
            None if number == 0 => XRefEntry::FREE_HEAD,
            None => XRefEntry::Free {
                next_free_object: 0,
                generation: 0,
            },
        };
        writer.write_all(entry.table_line()?.as_bytes())?;
    }

    Ok(())
}

/// Writer for XRef streams
#[derive(Debug, Clone)]
pub struct XRefStreamWriter {
    /// Entries keyed by object number
    entries: BTreeMap<u32, XRefEntry>,
    /// Field widths [type, field2, field3]
    widths: [usize; 3],
    /// Object ID for this XRef stream
    stream_id: ObjectId,
}

impl XRefStreamWriter {
    /// Create a new XRef stream writer
    pub fn new(stream_id: ObjectId) -> Self {
        Self {
            entries: BTreeMap::new(),
            widths: [1, 1, 1],
            stream_id,
        }
    }

    /// Add an entry for `number`, widening field 2/3 if needed
    pub fn add_entry(&mut self, number: u32, entry: XRefEntry) {
        let [_, field2, field3] = entry.fields();
        self.widths[1] = self.widths[1].max(Self::bytes_needed(field2));
        self.widths[2] = self.widths[2].max(Self::bytes_needed(field3));
        self.entries.insert(number, entry);
    }

    /// Add a free entry
    pub fn add_free_entry(&mut self, number: u32, next_free: u32, generation: u16) {
        self.add_entry(
            number,
            XRefEntry::Free {
                next_free_object: next_free,
                generation,
            },
        );
    }

    /// Add an in-use entry
    pub fn add_in_use_entry(&mut self, number: u32, offset: u64, generation: u16) {
        self.add_entry(number, XRefEntry::InUse { offset, generation });
    }

    /// Add a compressed entry
    pub fn add_compressed_entry(&mut self, number: u32, stream_object_number: u32, index: u32) {
        self.add_entry(
            number,
            XRefEntry::Compressed {
                stream_object_number,
                index_within_stream: index,
            },
        );
    }

    /// Calculate minimum bytes needed to represent a value
    fn bytes_needed(value: u64) -> usize {
        if value == 0 {
            1
        } else {
            ((value.ilog2() / 8) + 1) as usize
        }
    }

    /// Declared `/W` field widths
    pub fn widths(&self) -> [usize; 3] {
        self.widths
    }

    /// `/Index` as `(first object number, count)` runs of consecutive numbers
    pub fn index(&self) -> Vec<(u32, u32)> {
        let mut runs: Vec<(u32, u32)> = Vec::new();
        for &number in self.entries.keys() {
            match runs.last_mut() {
                Some((start, count)) if *start + *count == number => *count += 1,
                _ => runs.push((number, 1)),
            }
        }
        runs
    }

    /// Encode entries into binary records, in object-number order
    pub fn encode_entries(&self) -> Vec<u8> {
        let record_len: usize = self.widths.iter().sum();
        let mut data = Vec::with_capacity(record_len * self.entries.len());

        for entry in self.entries.values() {
            for (value, width) in entry.fields().into_iter().zip(self.widths) {
                Self::write_field(&mut data, value, width);
            }
        }

        data
    }

    /// Write a big-endian field with the specified width
    fn write_field(data: &mut Vec<u8>, value: u64, width: usize) {
        for i in (0..width).rev() {
            data.push(((value >> (i * 8)) & 0xFF) as u8);
        }
    }

    /// Create the XRef stream dictionary. `trailer` supplies `/Root`, `/Info`
    /// and `/Prev`, which live in the stream dictionary for this variant; a
    /// `/Size` in `trailer` replaces the computed one.
    pub fn create_dictionary(&self, trailer: &Dictionary) -> Dictionary {
        let mut dict = Dictionary::new();

        dict.set("Type", Object::name("XRef"));
        dict.set("Size", table_size(&self.entries));
        for (key, value) in trailer.iter() {
            dict.set(key.clone(), value.clone());
        }

        let index = self
            .index()
            .into_iter()
            .flat_map(|(start, count)| [Object::from(start), Object::from(count)])
            .collect::<Vec<_>>();
        dict.set("Index", index);

        dict.set(
            "W",
            self.widths
                .iter()
                .map(|w| Object::from(*w))
                .collect::<Vec<_>>(),
        );

        dict.set("Filter", Object::name("FlateDecode"));
        dict
    }

    /// Build the complete XRef stream object with compressed records
    pub fn build_object(&self, trailer: &Dictionary, level: u32) -> Result<IndirectObject> {
        let uncompressed = self.encode_entries();
        let compressed = compression::compress_with_level(&uncompressed, level)?;

        tracing::debug!(
            id = %self.stream_id,
            entries = self.entries.len(),
            widths = ?self.widths,
            raw = uncompressed.len(),
            compressed = compressed.len(),
            "encoded xref stream"
        );

        let dict = self.create_dictionary(trailer);
        Ok(IndirectObject::stream(
            self.stream_id,
            Stream::with_dictionary(dict, compressed),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ObjectBody;

    #[test]
    fn test_bytes_needed() {
        assert_eq!(XRefStreamWriter::bytes_needed(0), 1);
        assert_eq!(XRefStreamWriter::bytes_needed(255), 1);
        assert_eq!(XRefStreamWriter::bytes_needed(256), 2);
        assert_eq!(XRefStreamWriter::bytes_needed(65535), 2);
        assert_eq!(XRefStreamWriter::bytes_needed(65536), 3);
        assert_eq!(XRefStreamWriter::bytes_needed(16777215), 3);
        assert_eq!(XRefStreamWriter::bytes_needed(16777216), 4);
    }

    #[test]
    fn test_table_line_is_twenty_bytes() {
        let lines = [
            XRefEntry::FREE_HEAD.table_line().unwrap(),
            XRefEntry::InUse {
                offset: 9,
                generation: 0,
            }
            .table_line()
            .unwrap(),
        ];
        assert_eq!(lines[0], "0000000000 65535 f \n");
        assert_eq!(lines[1], "0000000009 00000 n \n");
        assert!(lines.iter().all(|l| l.len() == 20));
    }

    #[test]
    fn test_compressed_entry_has_no_table_line() {
        let entry = XRefEntry::Compressed {
            stream_object_number: 6,
            index_within_stream: 0,
        };
        assert!(entry.table_line().is_err());
    }

    #[test]
    fn test_write_xref_table_fills_gaps() {
        let mut entries = BTreeMap::new();
        entries.insert(0, XRefEntry::FREE_HEAD);
        entries.insert(
            1,
            XRefEntry::InUse {
                offset: 15,
                generation: 0,
            },
        );
        entries.insert(
            3,
            XRefEntry::InUse {
                offset: 120,
                generation: 0,
            },
        );

        let mut out = Vec::new();
        write_xref_table(&mut out, &entries, table_size(&entries)).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "xref\n0 4\n\
             0000000000 65535 f \n\
             0000000015 00000 n \n\
             0000000000 00000 f \n\
             0000000120 00000 n \n"
        );
    }

    #[test]
    fn test_encode_free_entry() {
        let mut writer = XRefStreamWriter::new(ObjectId::new(1, 0));
        writer.add_free_entry(0, 42, 1);

        assert_eq!(writer.widths(), [1, 1, 1]);
        assert_eq!(writer.encode_entries(), vec![0, 42, 1]);
    }

    #[test]
    fn test_encode_in_use_entry() {
        let mut writer = XRefStreamWriter::new(ObjectId::new(1, 0));
        writer.add_in_use_entry(1, 0x123456, 0);

        assert_eq!(writer.widths(), [1, 3, 1]);
        assert_eq!(writer.encode_entries(), vec![1, 0x12, 0x34, 0x56, 0]);
    }

    #[test]
    fn test_encode_compressed_entry() {
        let mut writer = XRefStreamWriter::new(ObjectId::new(1, 0));
        writer.add_compressed_entry(4, 5, 3);

        assert_eq!(writer.encode_entries(), vec![2, 5, 3]);
    }

    #[test]
    fn test_width_adjustment_applies_to_every_record() {
        let mut writer = XRefStreamWriter::new(ObjectId::new(9, 0));
        writer.add_entry(0, XRefEntry::FREE_HEAD);
        writer.add_in_use_entry(1, 15, 0);
        writer.add_in_use_entry(2, 0x1_0000, 0);

        assert_eq!(writer.widths(), [1, 3, 2]);
        let data = writer.encode_entries();
        assert_eq!(data.len(), 3 * 6);
        assert_eq!(&data[0..6], &[0, 0, 0, 0, 0xFF, 0xFF]);
        assert_eq!(&data[6..12], &[1, 0, 0, 15, 0, 0]);
        assert_eq!(&data[12..18], &[1, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_index_runs() {
        let mut writer = XRefStreamWriter::new(ObjectId::new(9, 0));
        for number in [0, 1, 2, 5, 6, 9] {
            writer.add_in_use_entry(number, 10, 0);
        }
        assert_eq!(writer.index(), vec![(0, 3), (5, 2), (9, 1)]);
    }

    #[test]
    fn test_create_dictionary_with_trailer() {
        let mut writer = XRefStreamWriter::new(ObjectId::new(6, 0));
        writer.add_entry(0, XRefEntry::FREE_HEAD);
        for number in 1..=6 {
            writer.add_in_use_entry(number, 100 * number as u64, 0);
        }

        let mut trailer = Dictionary::new();
        trailer.set("Root", ObjectId::new(1, 0));
        trailer.set("Prev", 1234u64);

        let dict = writer.create_dictionary(&trailer);

        assert_eq!(dict.get("Type").and_then(|o| o.as_name()), Some("XRef"));
        assert_eq!(dict.get("Size").and_then(|o| o.as_integer()), Some(7));
        assert_eq!(
            dict.get("Root").and_then(|o| o.as_reference()),
            Some(ObjectId::new(1, 0))
        );
        assert_eq!(dict.get("Prev").and_then(|o| o.as_integer()), Some(1234));
        assert_eq!(
            dict.get("Index"),
            Some(&Object::Array(vec![Object::Integer(0), Object::Integer(7)]))
        );
        assert_eq!(
            dict.get("W"),
            Some(&Object::Array(vec![
                Object::Integer(1),
                Object::Integer(2),
                Object::Integer(2)
            ]))
        );
        assert_eq!(
            dict.get("Filter").and_then(|o| o.as_name()),
            Some("FlateDecode")
        );
    }

    #[test]
    fn test_build_object_roundtrip() {
        let mut writer = XRefStreamWriter::new(ObjectId::new(5, 0));
        writer.add_entry(0, XRefEntry::FREE_HEAD);
        writer.add_in_use_entry(1, 15, 0);
        writer.add_in_use_entry(2, 94, 0);

        let object = writer.build_object(&Dictionary::new(), 6).unwrap();
        assert_eq!(object.id(), ObjectId::new(5, 0));

        let ObjectBody::Stream(stream) = object.body() else {
            panic!("xref stream must be a stream object");
        };
        assert_eq!(stream.declared_length(), Some(stream.data().len() as i64));
        assert_eq!(
            compression::decompress(stream.data()).unwrap(),
            writer.encode_entries()
        );
    }
}
