//! Export tables and synthesized entries.

use indexmap::IndexMap;
use serde::Serialize;

/// The class-name keys a CSS module exports, in enumeration order.
///
/// Values are the hashed selectors. A value is `None` when the evaluator saw
/// the key but could not resolve it to a string literal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportTable {
    entries: IndexMap<String, Option<String>>,
}

impl ExportTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a key with its hashed selector.
    ///
    /// Re-inserting a key replaces its value but keeps its position.
    pub fn insert(&mut self, rule: impl Into<String>, hashed_value: impl Into<String>) {
        self.entries
            .insert(rule.into(), Some(hashed_value.into()));
    }

    /// Inserts a key whose value is not statically known.
    pub fn insert_unresolved(&mut self, rule: impl Into<String>) {
        self.entries.insert(rule.into(), None);
    }

    /// Returns the number of keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the hashed selector of a key.
    pub fn get(&self, rule: &str) -> Option<&str> {
        self.entries.get(rule).and_then(|value| value.as_deref())
    }

    /// Iterates keys and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(rule, value)| (rule.as_str(), value.as_deref()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExportTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (rule, hashed_value) in iter {
            table.insert(rule, hashed_value);
        }
        table
    }
}

/// One exported key, correlated with its authoring location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntry {
    /// The authored class name.
    pub rule: String,
    /// The generated selector.
    pub hashed_value: Option<String>,
    /// 1-indexed original line the selector was generated from.
    pub matched_line: Option<u32>,
    /// Doc comment closing on the line above `matched_line`.
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insertion_order() {
        let table: ExportTable = [("zeta", "z_1"), ("alpha", "a_1"), ("mid", "m_1")]
            .into_iter()
            .collect();
        let rules: Vec<&str> = table.iter().map(|(rule, _)| rule).collect();
        assert_eq!(rules, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut table = ExportTable::new();
        table.insert("a", "a_1");
        table.insert("b", "b_1");
        table.insert("a", "a_2");
        let pairs: Vec<_> = table.iter().collect();
        assert_eq!(pairs, vec![("a", Some("a_2")), ("b", Some("b_1"))]);
    }

    #[test]
    fn test_unresolved_value() {
        let mut table = ExportTable::new();
        table.insert_unresolved("dynamic");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("dynamic"), None);
    }
}
