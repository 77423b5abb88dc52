use indexmap::IndexMap;
use indexmap::map::{IntoIter, Iter};

/// Ordered mapping from attribute name to resource id.
///
/// Entries keep the position of their first insertion. Inserting a name that
/// is already present replaces its id in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceIdTable {
    entries: IndexMap<String, u32>,
}

impl ResourceIdTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry, returning the previous id if there was one
    pub fn insert(&mut self, name: impl Into<String>, id: u32) -> Option<u32> {
        self.entries.insert(name.into(), id)
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> Iter<'_, String, u32> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Consume the table into `(name, id)` pairs in insertion order
    pub fn into_entries(self) -> Vec<(String, u32)> {
        self.entries.into_iter().collect()
    }
}

impl FromIterator<(String, u32)> for ResourceIdTable {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, id) in iter {
            table.insert(name, id);
        }
        table
    }
}

impl IntoIterator for ResourceIdTable {
    type Item = (String, u32);
    type IntoIter = IntoIter<String, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResourceIdTable {
    type Item = (&'a String, &'a u32);
    type IntoIter = Iter<'a, String, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_keeps_first_position_and_last_value() {
        let mut table = ResourceIdTable::new();
        assert_eq!(table.insert("textColor", 1), None);
        table.insert("textSize", 2);
        assert_eq!(table.insert("textColor", 3), Some(1));

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.into_entries(),
            vec![("textColor".to_string(), 3), ("textSize".to_string(), 2)]
        );
    }

    #[test]
    fn test_lookup() {
        let table: ResourceIdTable = vec![("layout_width".to_string(), 16842996)]
            .into_iter()
            .collect();
        assert_eq!(table.get("layout_width"), Some(16842996));
        assert!(table.contains("layout_width"));
        assert_eq!(table.get("layout_height"), None);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["layout_width"]);
    }
}
