use crate::objects::Object;
use std::collections::BTreeMap;

/// PDF dictionary with keys kept in sorted order, so serialization does not
/// depend on insertion or hashing order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dictionary {
    entries: BTreeMap<String, Object>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Object>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Object> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &Object)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut dict = Dictionary::new();
        assert!(dict.is_empty());
        dict.set("Type", Object::name("Page"));
        dict.set("Count", 2usize);

        assert_eq!(dict.len(), 2);
        assert!(dict.contains_key("Type"));
        assert_eq!(dict.get("Count"), Some(&Object::Integer(2)));
        assert_eq!(dict.get("Missing"), None);
    }

    #[test]
    fn test_entries_are_sorted() {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::name("Pages"));
        dict.set("Kids", Vec::<Object>::new());
        dict.set("Count", 0usize);

        let keys: Vec<_> = dict.entries().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["Count", "Kids", "Type"]);
    }

    #[test]
    fn test_set_overwrites() {
        let mut dict = Dictionary::new();
        dict.set("Length", 1i64);
        dict.set("Length", 5i64);
        assert_eq!(dict.get("Length"), Some(&Object::Integer(5)));
        assert_eq!(dict.len(), 1);
    }
}
