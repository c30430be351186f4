//! String-interned identifiers for diagram elements.
//!
//! Node and cluster identifiers are compared and hashed constantly during
//! structure building and layout, so they are interned once and passed around
//! as a `Copy` symbol.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Interned identifier.
///
/// # Examples
///
/// ```
/// use archviz_core::identifier::Id;
///
/// let id = Id::new("waf");
/// assert_eq!(id, "waf");
///
/// let node = Id::indexed("node", 3);
/// assert_eq!(node, "node_3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a string slice.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates an `Id` of the form `{prefix}_{idx}`.
    ///
    /// Diagram elements have no user-facing names, only labels, so their
    /// identifiers are derived from their declaration index.
    pub fn indexed(prefix: &str, idx: usize) -> Self {
        Self::new(&format!("{prefix}_{idx}"))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{str_value}")
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("build");
        let id2 = Id::new("build");
        let id3 = Id::new("api");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "build");
    }

    #[test]
    fn test_indexed() {
        assert_eq!(Id::indexed("node", 0), "node_0");
        assert_eq!(Id::indexed("cluster", 2), "cluster_2");
        assert_ne!(Id::indexed("node", 1), Id::indexed("cluster", 1));
        assert_eq!(Id::indexed("node", 4), Id::new("node_4"));
    }

    #[test]
    fn test_display_trait() {
        let id = Id::new("display_test");
        assert_eq!(format!("{id}"), "display_test");
    }

    #[test]
    fn test_hash_and_eq() {
        let mut map = HashMap::new();
        map.insert(Id::new("key1"), "value1");
        map.insert(Id::new("key2"), "value2");

        assert_eq!(map.get(&Id::new("key1")), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_partial_eq_str() {
        let id = Id::new("GitHub repo");
        assert!(id == "GitHub repo");
        assert!(id != "GitHub");
    }
}
