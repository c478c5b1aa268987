//! Namespace registry.
//!
//! Maps namespace identifiers to the [`SettingSet`] that declares their
//! settings. The root namespace is bound when the registry is created.

use std::collections::HashMap;
use std::fmt;

use crate::settings::SettingSet;
use crate::store::normalize_namespace;

/// Mapping from namespace to its setting set.
///
/// `""` and `"default"` both name the root namespace.
pub struct NamespaceRegistry {
    sets: HashMap<String, Box<dyn SettingSet>>,
}

impl NamespaceRegistry {
    /// Creates a registry with `root` bound to the root namespace.
    #[must_use]
    pub fn new(root: Box<dyn SettingSet>) -> Self {
        let mut sets = HashMap::new();
        sets.insert(String::new(), root);
        Self { sets }
    }

    /// Binds `set` to `namespace`, returning the set it replaced, if any.
    pub fn register(
        &mut self,
        namespace: &str,
        set: Box<dyn SettingSet>,
    ) -> Option<Box<dyn SettingSet>> {
        let namespace = normalize_namespace(namespace).to_string();
        tracing::debug!(namespace = %namespace, "Registered namespace");
        self.sets.insert(namespace, set)
    }

    /// Returns the set bound to `namespace`.
    #[must_use]
    pub fn get(&self, namespace: &str) -> Option<&dyn SettingSet> {
        self.sets
            .get(normalize_namespace(namespace))
            .map(|set| &**set)
    }

    /// Returns the set bound to `namespace`, mutably.
    pub fn get_mut(&mut self, namespace: &str) -> Option<&mut (dyn SettingSet + 'static)> {
        self.sets
            .get_mut(normalize_namespace(namespace))
            .map(|set| &mut **set)
    }

    /// Returns `true` if `namespace` is bound.
    #[must_use]
    pub fn contains(&self, namespace: &str) -> bool {
        self.sets.contains_key(normalize_namespace(namespace))
    }

    /// Number of bound namespaces, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Always `false`: the root namespace is bound at construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Iterates over namespaces in unspecified order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Iterates mutably over all bindings in unspecified order.
    pub fn sets_mut(&mut self) -> impl Iterator<Item = (&str, &mut (dyn SettingSet + 'static))> {
        self.sets
            .iter_mut()
            .map(|(namespace, set)| (namespace.as_str(), &mut **set))
    }
}

impl fmt::Debug for NamespaceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.namespaces().collect();
        names.sort_unstable();
        f.debug_struct("NamespaceRegistry")
            .field("namespaces", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::FlagSet;

    fn registry() -> NamespaceRegistry {
        NamespaceRegistry::new(Box::new(FlagSet::new("app").float("b", 5.0, "")))
    }

    #[test]
    fn root_is_registered_at_construction() {
        let registry = registry();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains(""));
        assert!(registry.contains("default"));
        assert_eq!(registry.get("").unwrap().declared(), vec!["b"]);
    }

    #[test]
    fn register_adds_namespace() {
        let mut registry = registry();
        let previous = registry.register("custom", Box::new(FlagSet::new("custom")));

        assert!(previous.is_none());
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("custom"));
    }

    #[test]
    fn last_register_wins() {
        let mut registry = registry();
        registry.register("custom", Box::new(FlagSet::new("custom").string("d", "x", "")));
        let previous =
            registry.register("custom", Box::new(FlagSet::new("custom").string("e", "y", "")));

        assert_eq!(previous.unwrap().declared(), vec!["d"]);
        assert_eq!(registry.get("custom").unwrap().declared(), vec!["e"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn registering_default_replaces_root() {
        let mut registry = registry();
        registry.register("default", Box::new(FlagSet::new("app").int("n", 1, "")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("").unwrap().declared(), vec!["n"]);
    }

    #[test]
    fn get_mut_allows_assignment() {
        let mut registry = registry();
        registry.get_mut("").unwrap().assign("b", "7.5").unwrap();

        assert_eq!(registry.get("").unwrap().get::<f64>("b"), Some(7.5));
    }

    #[test]
    fn debug_lists_sorted_namespaces() {
        let mut registry = registry();
        registry.register("zz", Box::new(FlagSet::new("zz")));
        registry.register("aa", Box::new(FlagSet::new("aa")));

        assert_eq!(
            format!("{registry:?}"),
            r#"NamespaceRegistry { namespaces: ["", "aa", "zz"] }"#
        );
    }
}
