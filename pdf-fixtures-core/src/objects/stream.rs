use crate::compression;
use crate::error::Result;
use crate::objects::{Dictionary, Object};

/// Stream dictionary plus payload. `/Length` tracks the payload for every
/// operation except [`Stream::data_mut`], which leaves the declared length
/// untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    dictionary: Dictionary,
    data: Vec<u8>,
}

impl Stream {
    pub fn new(data: Vec<u8>) -> Self {
        Self::with_dictionary(Dictionary::new(), data)
    }

    pub fn with_dictionary(dictionary: Dictionary, data: Vec<u8>) -> Self {
        let mut dictionary = dictionary;
        dictionary.set("Length", data.len());

        Self { dictionary, data }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn dictionary_mut(&mut self) -> &mut Dictionary {
        &mut self.dictionary
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }

    pub fn set_data(&mut self, data: Vec<u8>) {
        self.data = data;
        self.dictionary.set("Length", self.data.len());
    }

    pub fn set_filter(&mut self, filter: &str) {
        self.dictionary.set("Filter", Object::name(filter));
    }

    /// Replace the payload with its zlib encoding and declare `/FlateDecode`.
    pub fn compress_flate(&mut self, level: u32) -> Result<()> {
        let compressed = compression::compress_with_level(&self.data, level)?;
        self.set_filter("FlateDecode");
        self.set_data(compressed);
        Ok(())
    }

    /// The `/Length` value currently declared in the dictionary
    pub fn declared_length(&self) -> Option<i64> {
        self.dictionary.get("Length").and_then(Object::as_integer)
    }
}
