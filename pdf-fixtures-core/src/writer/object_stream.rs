//! Object stream packing (ISO 32000-1 §7.5.7)
//!
//! The decompressed payload is an index of `number offset` pairs followed by
//! the member bodies. `/First` is the byte length of that index, and every
//! recorded offset is relative to `/First`.

use crate::compression;
use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, IndirectObject, Object, ObjectId, Stream};
use crate::writer::serializer::serialize_body;

/// Collects members destined for one object stream container
#[derive(Debug, Clone)]
pub struct ObjectStreamPacker {
    container_id: ObjectId,
    members: Vec<IndirectObject>,
}

/// Result of packing: the container object plus the member layout needed for
/// type-2 cross-reference entries
#[derive(Debug, Clone)]
pub struct PackedObjectStream {
    container: IndirectObject,
    /// `(object number, index within the stream)` in packing order
    members: Vec<(u32, u32)>,
    /// Uncompressed payload, kept for inspection
    decompressed: Vec<u8>,
    first: usize,
}

impl ObjectStreamPacker {
    pub fn new(container_id: ObjectId) -> Self {
        Self {
            container_id,
            members: Vec::new(),
        }
    }

    /// Queue a member. Members must be generation 0 non-stream objects.
    pub fn add(&mut self, object: IndirectObject) -> Result<&mut Self> {
        let id = object.id();
        if id.number() == 0 {
            return Err(PdfError::InvalidObjectStreamMember(
                id,
                "object 0 is reserved for the free list head".to_string(),
            ));
        }
        if id.generation() != 0 {
            return Err(PdfError::InvalidObjectStreamMember(
                id,
                "compressed objects must have generation 0".to_string(),
            ));
        }
        if object.is_stream() {
            return Err(PdfError::InvalidObjectStreamMember(
                id,
                "stream objects cannot be stored in an object stream".to_string(),
            ));
        }
        if id == self.container_id {
            return Err(PdfError::InvalidObjectStreamMember(
                id,
                "an object stream cannot contain itself".to_string(),
            ));
        }
        if self.members.iter().any(|m| m.id().number() == id.number()) {
            return Err(PdfError::DuplicateObject(id.number()));
        }
        self.members.push(object);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Serialize, index and compress the members into one container object
    pub fn pack(&self, level: u32) -> Result<PackedObjectStream> {
        if self.members.is_empty() {
            return Err(PdfError::InvalidStructure(format!(
                "object stream {} has no members",
                self.container_id
            )));
        }

        let mut bodies = Vec::new();
        let mut header = String::new();
        let mut members = Vec::with_capacity(self.members.len());

        for (index, member) in self.members.iter().enumerate() {
            if index > 0 {
                bodies.push(b' ');
            }
            let relative_offset = bodies.len();
            bodies.extend_from_slice(&serialize_body(member)?);

            if index > 0 {
                header.push(' ');
            }
            header.push_str(&format!("{} {}", member.id().number(), relative_offset));
            members.push((member.id().number(), index as u32));
        }
        header.push(' ');

        let first = header.len();
        let mut decompressed = header.into_bytes();
        decompressed.extend_from_slice(&bodies);

        let compressed = compression::compress_with_level(&decompressed, level)?;

        let mut dict = Dictionary::new();
        dict.set("Type", Object::name("ObjStm"));
        dict.set("N", self.members.len());
        dict.set("First", first);
        dict.set("Filter", Object::name("FlateDecode"));

        tracing::debug!(
            id = %self.container_id,
            members = self.members.len(),
            first,
            raw = decompressed.len(),
            compressed = compressed.len(),
            "packed object stream"
        );

        Ok(PackedObjectStream {
            container: IndirectObject::stream(
                self.container_id,
                Stream::with_dictionary(dict, compressed),
            ),
            members,
            decompressed,
            first,
        })
    }
}

impl PackedObjectStream {
    pub fn container(&self) -> &IndirectObject {
        &self.container
    }

    pub fn container_id(&self) -> ObjectId {
        self.container.id()
    }

    pub fn members(&self) -> &[(u32, u32)] {
        &self.members
    }

    pub fn decompressed(&self) -> &[u8] {
        &self.decompressed
    }

    /// Value declared as `/First`
    pub fn first(&self) -> usize {
        self.first
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ObjectBody;

    fn font(number: u32) -> IndirectObject {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::name("Font"));
        dict.set("Subtype", Object::name("Type1"));
        dict.set("BaseFont", Object::name("Helvetica"));
        IndirectObject::dictionary(ObjectId::new(number, 0), dict)
    }

    #[test]
    fn test_pack_layout() {
        let mut packer = ObjectStreamPacker::new(ObjectId::new(6, 0));
        packer.add(font(3)).unwrap();
        packer.add(IndirectObject::new(ObjectId::new(4, 0), 42)).unwrap();

        let packed = packer.pack(6).unwrap();
        let body = b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>";
        let expected_header = format!("3 0 4 {} ", body.len() + 1);

        assert_eq!(packed.first(), expected_header.len());
        assert_eq!(packed.members(), &[(3, 0), (4, 1)]);

        let mut expected = expected_header.into_bytes();
        expected.extend_from_slice(body);
        expected.extend_from_slice(b" 42");
        assert_eq!(packed.decompressed(), expected.as_slice());
    }

    #[test]
    fn test_container_dictionary() {
        let mut packer = ObjectStreamPacker::new(ObjectId::new(6, 0));
        packer.add(font(3)).unwrap();

        let packed = packer.pack(6).unwrap();
        let ObjectBody::Stream(stream) = packed.container().body() else {
            panic!("container must be a stream");
        };
        let dict = stream.dictionary();

        assert_eq!(dict.get("Type").and_then(|o| o.as_name()), Some("ObjStm"));
        assert_eq!(dict.get("N").and_then(|o| o.as_integer()), Some(1));
        assert_eq!(
            dict.get("First").and_then(|o| o.as_integer()),
            Some(packed.first() as i64)
        );
        assert_eq!(
            compression::decompress(stream.data()).unwrap(),
            packed.decompressed()
        );
    }

    #[test]
    fn test_rejects_invalid_members() {
        let mut packer = ObjectStreamPacker::new(ObjectId::new(6, 0));

        let stream = IndirectObject::stream(ObjectId::new(5, 0), Stream::new(vec![1, 2]));
        assert!(packer.add(stream).is_err());

        let nonzero_generation = IndirectObject::new(ObjectId::new(7, 1), 1);
        assert!(packer.add(nonzero_generation).is_err());

        let itself = IndirectObject::new(ObjectId::new(6, 0), 1);
        assert!(packer.add(itself).is_err());

        let free_head = IndirectObject::new(ObjectId::new(0, 0), 1);
        assert!(matches!(
            packer.add(free_head),
            Err(PdfError::InvalidObjectStreamMember(..))
        ));

        packer.add(font(3)).unwrap();
        assert!(matches!(
            packer.add(font(3)),
            Err(PdfError::DuplicateObject(3))
        ));
        assert_eq!(packer.len(), 1);
    }

    #[test]
    fn test_empty_pack_fails() {
        let packer = ObjectStreamPacker::new(ObjectId::new(6, 0));
        assert!(packer.is_empty());
        assert!(packer.pack(6).is_err());
    }
}
