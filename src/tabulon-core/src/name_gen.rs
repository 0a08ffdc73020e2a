//! Collision-free column naming.

use std::collections::HashSet;

/// Hands out column names that are unique within one table level.
///
/// A taken name gets a `_2`, `_3`, ... suffix: the first free one wins.
#[derive(Debug, Clone, Default)]
pub struct ColumnNameGenerator {
    used: HashSet<String>,
    names: Vec<String>,
}

impl ColumnNameGenerator {
    /// Create a generator with `names` already taken.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut generator = Self::default();
        for name in names {
            generator.add_if_absent(name);
        }
        generator
    }

    /// Reserve and return `preferred`, or the first free suffixed variant.
    pub fn add_unique(&mut self, preferred: &str) -> String {
        let mut name = preferred.to_string();
        let mut k = 2;
        while self.used.contains(&name) {
            name = format!("{preferred}_{k}");
            k += 1;
        }
        self.used.insert(name.clone());
        self.names.push(name.clone());
        name
    }

    /// Reserve `name` unless it is already taken.
    pub fn add_if_absent(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.used.insert(name.clone()) {
            self.names.push(name);
        }
    }

    /// Whether `name` is taken.
    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Taken names in reservation order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_unique_suffixes() {
        let mut generator = ColumnNameGenerator::new(["a", "b"]);
        assert_eq!(generator.add_unique("c"), "c");
        assert_eq!(generator.add_unique("a"), "a_2");
        assert_eq!(generator.add_unique("a"), "a_3");
        assert_eq!(generator.names(), ["a", "b", "c", "a_2", "a_3"]);
    }

    #[test]
    fn test_suffix_skips_taken_variants() {
        let mut generator = ColumnNameGenerator::new(["x", "x_2"]);
        assert_eq!(generator.add_unique("x"), "x_3");
    }

    #[test]
    fn test_add_if_absent() {
        let mut generator = ColumnNameGenerator::default();
        generator.add_if_absent("a");
        generator.add_if_absent("a");
        assert!(generator.contains("a"));
        assert_eq!(generator.names().len(), 1);
    }
}
