//! Variable scopes
//!
//! A [`Collection`] is a named bag of bindings. A [`Scope`] is a write target
//! (one collection) plus the collections loaded beneath it. The
//! [`ScopeManager`] keeps the stack of entered scopes; the top one is active.

use serde::Serialize;

use crate::FxIndexMap;

/// Name of the collection backing the root scope
pub const ROOT_COLLECTION: &str = "global";

/// Type tag of scopes that never received a `!type` statement
pub const IMPLICIT_TYPE: &str = "implicit";

/// Named set of explicit and default variable bindings
#[derive(Debug, Clone, Default, Serialize)]
pub struct Collection {
    values: FxIndexMap<String, String>,
    defaults: FxIndexMap<String, String>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }

    pub fn set_default(&mut self, name: &str, value: &str) {
        self.defaults.insert(name.to_string(), value.to_string());
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn default_value(&self, name: &str) -> Option<&str> {
        self.defaults.get(name).map(String::as_str)
    }

    /// Explicit value, falling back to the default
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.value(name).or_else(|| self.default_value(name))
    }
}

/// One entered scope
#[derive(Debug, Clone, Serialize)]
pub struct Scope {
    collection: String,
    loaded: Vec<String>,
    #[serde(rename = "type")]
    kind: String,
}

impl Scope {
    fn new(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            loaded: Vec::new(),
            kind: IMPLICIT_TYPE.to_string(),
        }
    }

    /// Name of the backing collection
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Collections consulted after the backing one, in load order
    pub fn loaded(&self) -> &[String] {
        &self.loaded
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

/// Owns every collection and the stack of entered scopes
#[derive(Debug, Clone, Serialize)]
pub struct ScopeManager {
    collections: FxIndexMap<String, Collection>,
    stack: Vec<Scope>,
}

impl Default for ScopeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeManager {
    pub fn new() -> Self {
        let mut collections = FxIndexMap::default();
        collections.insert(ROOT_COLLECTION.to_string(), Collection::new());
        Self {
            collections,
            stack: vec![Scope::new(ROOT_COLLECTION)],
        }
    }

    /// Get the named collection, creating it if absent
    pub fn activate_collection(&mut self, name: &str) -> &mut Collection {
        self.collections.entry(name.to_string()).or_default()
    }

    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    pub fn collections(&self) -> &FxIndexMap<String, Collection> {
        &self.collections
    }

    pub fn active_scope(&self) -> &Scope {
        // The root scope is never popped
        &self.stack[self.stack.len() - 1]
    }

    fn active_scope_mut(&mut self) -> &mut Scope {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Number of entered scopes, root included
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Make a scope over `collection` the active one
    ///
    /// Re-entering a collection already on the stack unwinds back to it;
    /// otherwise a new scope is pushed on top of the current one.
    pub fn enter(&mut self, collection: &str) {
        self.activate_collection(collection);
        match self.stack.iter().rposition(|s| s.collection == collection) {
            Some(pos) => self.stack.truncate(pos + 1),
            None => self.stack.push(Scope::new(collection)),
        }
    }

    /// Append collections to the active scope's lookup chain
    pub fn load_collections<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            let name = name.as_ref();
            self.activate_collection(name);
            let scope = self.active_scope_mut();
            if scope.collection != name && !scope.loaded.iter().any(|l| l == name) {
                scope.loaded.push(name.to_string());
            }
        }
    }

    pub fn set_type(&mut self, kind: &str) {
        self.active_scope_mut().kind = kind.to_string();
    }

    /// Collection names consulted on lookup, in order, without duplicates
    ///
    /// The active scope's own collection comes first, then its loaded
    /// collections, then the chains of the enclosing scopes.
    pub fn lookup_chain(&self) -> Vec<&str> {
        let mut chain: Vec<&str> = Vec::new();
        for scope in self.stack.iter().rev() {
            let names = std::iter::once(&scope.collection).chain(scope.loaded.iter());
            for name in names {
                if !chain.contains(&name.as_str()) {
                    chain.push(name.as_str());
                }
            }
        }
        chain
    }

    /// Resolve a variable: explicit values along the chain, then defaults
    pub fn get(&self, name: &str) -> Option<&str> {
        let chain: Vec<&Collection> = self
            .lookup_chain()
            .into_iter()
            .filter_map(|c| self.collections.get(c))
            .collect();

        chain
            .iter()
            .copied()
            .find_map(|c| c.value(name))
            .or_else(|| chain.iter().copied().find_map(|c| c.default_value(name)))
    }

    /// Resolve `name` directly inside one collection
    pub fn get_in(&self, collection: &str, name: &str) -> Option<&str> {
        self.collections.get(collection).and_then(|c| c.resolve(name))
    }

    /// Resolve `collection/name`, trying the whole path as a plain name first
    pub fn get_path(&self, path: &str) -> Option<&str> {
        self.get(path).or_else(|| {
            let (collection, name) = path.rsplit_once('/')?;
            self.get_in(collection, name)
        })
    }

    fn active_collection_mut(&mut self) -> &mut Collection {
        let name = self.active_scope().collection.clone();
        self.activate_collection(&name)
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.active_collection_mut().set(name, value);
    }

    pub fn set_default(&mut self, name: &str, value: &str) {
        self.active_collection_mut().set_default(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_scope() {
        let manager = ScopeManager::new();
        assert_eq!(manager.active_scope().collection(), ROOT_COLLECTION);
        assert_eq!(manager.active_scope().kind(), IMPLICIT_TYPE);
        assert_eq!(manager.depth(), 1);
    }

    #[test]
    fn test_explicit_beats_default() {
        let mut manager = ScopeManager::new();
        manager.set_default("gap", "4px");
        assert_eq!(manager.get("gap"), Some("4px"));
        manager.set("gap", "8px");
        assert_eq!(manager.get("gap"), Some("8px"));
        assert_eq!(manager.get("missing"), None);
    }

    #[test]
    fn test_loaded_collection_visible_but_not_shadowing() {
        let mut manager = ScopeManager::new();
        manager.activate_collection("theme").set("primary", "blue");
        manager.activate_collection("theme").set("accent", "pink");

        manager.enter("main");
        manager.set("primary", "red");
        manager.load_collections(&["theme"]);

        assert_eq!(manager.get("accent"), Some("pink"));
        assert_eq!(manager.get("primary"), Some("red"));
    }

    #[test]
    fn test_loaded_explicit_beats_active_default() {
        let mut manager = ScopeManager::new();
        manager.activate_collection("theme").set("primary", "blue");
        manager.enter("main");
        manager.set_default("primary", "gray");
        manager.load_collections(&["theme"]);
        assert_eq!(manager.get("primary"), Some("blue"));
    }

    #[test]
    fn test_load_order() {
        let mut manager = ScopeManager::new();
        manager.activate_collection("a").set_default("size", "1");
        manager.activate_collection("b").set_default("size", "2");
        manager.activate_collection("b").set("weight", "bold");
        manager.activate_collection("c").set("weight", "light");
        manager.load_collections(&["a", "b", "c"]);
        assert_eq!(manager.get("size"), Some("1"));
        assert_eq!(manager.get("weight"), Some("bold"));
        assert_eq!(manager.lookup_chain(), vec!["global", "a", "b", "c"]);
    }

    #[test]
    fn test_nested_scope_sees_enclosing() {
        let mut manager = ScopeManager::new();
        manager.set("primary", "red");
        manager.enter("card");
        assert_eq!(manager.get("primary"), Some("red"));

        manager.set("primary", "green");
        assert_eq!(manager.get("primary"), Some("green"));
        assert_eq!(manager.get_in(ROOT_COLLECTION, "primary"), Some("red"));
        assert_eq!(manager.get_path("global/primary"), Some("red"));
        assert_eq!(manager.get_path("card/primary"), Some("green"));
    }

    #[test]
    fn test_reenter_unwinds() {
        let mut manager = ScopeManager::new();
        manager.enter("main");
        manager.enter("card");
        assert_eq!(manager.depth(), 3);
        assert_eq!(manager.lookup_chain(), vec!["card", "main", "global"]);

        manager.enter("main");
        assert_eq!(manager.depth(), 2);
        assert_eq!(manager.active_scope().collection(), "main");

        manager.enter(ROOT_COLLECTION);
        assert_eq!(manager.depth(), 1);
    }

    #[test]
    fn test_set_type() {
        let mut manager = ScopeManager::new();
        manager.enter("main");
        manager.set_type("theme");
        assert_eq!(manager.active_scope().kind(), "theme");
        manager.enter("other");
        assert_eq!(manager.active_scope().kind(), IMPLICIT_TYPE);
    }
}
