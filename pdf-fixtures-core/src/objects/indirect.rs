use crate::objects::{Dictionary, Object, ObjectId, Stream};

/// What an indirect object holds between `obj` and `endobj`
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectBody {
    Direct(Object),
    Stream(Stream),
}

/// A numbered object, built once by a fixture recipe and serialized once.
#[derive(Debug, Clone, PartialEq)]
pub struct IndirectObject {
    id: ObjectId,
    body: ObjectBody,
}

impl IndirectObject {
    pub fn new(id: ObjectId, object: impl Into<Object>) -> Self {
        Self {
            id,
            body: ObjectBody::Direct(object.into()),
        }
    }

    pub fn dictionary(id: ObjectId, dict: Dictionary) -> Self {
        Self::new(id, Object::Dictionary(dict))
    }

    pub fn stream(id: ObjectId, stream: Stream) -> Self {
        Self {
            id,
            body: ObjectBody::Stream(stream),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn body(&self) -> &ObjectBody {
        &self.body
    }

    pub fn is_stream(&self) -> bool {
        matches!(self.body, ObjectBody::Stream(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let id = ObjectId::new(4, 0);
        let plain = IndirectObject::dictionary(id, Dictionary::new());
        assert_eq!(plain.id(), id);
        assert!(!plain.is_stream());

        let stream = IndirectObject::stream(id, Stream::new(b"BT ET".to_vec()));
        assert!(stream.is_stream());
        match stream.body() {
            ObjectBody::Stream(s) => assert_eq!(s.data(), b"BT ET"),
            ObjectBody::Direct(_) => panic!("expected stream body"),
        }
    }
}
