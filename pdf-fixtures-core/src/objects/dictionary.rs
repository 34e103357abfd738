use crate::objects::Object;

/// PDF dictionary that keeps its keys in insertion order.
///
/// Fixtures are compared byte for byte, so the serialized key order has to be
/// stable across runs. Replacing an existing key keeps its original position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dictionary {
    entries: Vec<(String, Object)>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Object>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Object> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Object> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Object)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn get_dict(&self, key: &str) -> Option<&Dictionary> {
        self.get(key).and_then(Object::as_dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dictionary() {
        let dict = Dictionary::new();
        assert!(dict.is_empty());
        assert_eq!(dict.len(), 0);
    }

    #[test]
    fn test_set_and_get() {
        let mut dict = Dictionary::new();
        dict.set("Name", "Test");
        dict.set("Age", 42);
        dict.set("Active", true);

        assert_eq!(dict.get("Name"), Some(&Object::String("Test".to_string())));
        assert_eq!(dict.get("Age"), Some(&Object::Integer(42)));
        assert_eq!(dict.get("Active"), Some(&Object::Boolean(true)));
        assert_eq!(dict.get("Missing"), None);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::name("Page"));
        dict.set("Parent", 2);
        dict.set("MediaBox", 0);
        dict.set("Contents", 4);

        let keys: Vec<_> = dict.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Type", "Parent", "MediaBox", "Contents"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut dict = Dictionary::new();
        dict.set("Length", 999);
        dict.set("Filter", Object::name("FlateDecode"));
        dict.set("Length", 12);

        let entries: Vec<_> = dict.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "Length");
        assert_eq!(entries[0].1, &Object::Integer(12));
    }

    #[test]
    fn test_remove() {
        let mut dict = Dictionary::new();
        dict.set("Temp", "Value");
        dict.set("Keep", 1);

        assert_eq!(dict.remove("Temp"), Some(Object::String("Value".to_string())));
        assert!(!dict.contains_key("Temp"));
        assert_eq!(dict.remove("Temp"), None);
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_get_dict() {
        let mut font = Dictionary::new();
        font.set("F1", Object::Null);
        let mut resources = Dictionary::new();
        resources.set("Font", font.clone());

        assert_eq!(resources.get_dict("Font"), Some(&font));
        assert_eq!(resources.get_dict("Missing"), None);
    }
}
