//! Compilation store
//!
//! The single accumulator a compilation writes into: style rules,
//! keyframe animations, reduced-motion animations, fonts and scopes.
//! Properties are kept in camelCase; they are kebab-cased only when rendered.

use serde::Serialize;
use smallvec::SmallVec;

use crate::scope::{Collection, ScopeManager};
use crate::FxIndexMap;

/// Competing values written for one property, oldest first
pub type StyleValues = SmallVec<[String; 2]>;

/// Declarations of one selector: camelCase property -> candidate values
pub type Style = FxIndexMap<String, StyleValues>;

/// Keyframe label ("from", "50%", ...) -> camelCase property -> value
pub type Animation = FxIndexMap<String, FxIndexMap<String, String>>;

/// A font registered with `font`
#[derive(Debug, Clone, Default, Serialize)]
pub struct FontFace {
    /// Source URL, emitted as `src:url(...)`
    pub source: Option<String>,
    /// Extra descriptors (e.g. `font-weight`), emitted after `src`
    pub descriptors: FxIndexMap<String, String>,
}

impl FontFace {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            descriptors: FxIndexMap::default(),
        }
    }

    pub fn with_descriptor(mut self, name: &str, value: &str) -> Self {
        self.descriptors.insert(name.to_string(), value.to_string());
        self
    }
}

/// Everything a compilation produces before rendering
#[derive(Debug, Clone, Default, Serialize)]
pub struct Store {
    styles: FxIndexMap<String, Style>,
    animations: FxIndexMap<String, Animation>,
    motions: FxIndexMap<String, Animation>,
    fonts: FxIndexMap<String, FontFace>,
    #[serde(rename = "scopes")]
    scope_manager: ScopeManager,
}

/// Split a comma-separated selector list, dropping empty entries
fn selector_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn styles(&self) -> &FxIndexMap<String, Style> {
        &self.styles
    }

    pub fn style(&self, selector: &str) -> Option<&Style> {
        self.styles.get(selector)
    }

    pub fn animations(&self) -> &FxIndexMap<String, Animation> {
        &self.animations
    }

    pub fn motions(&self) -> &FxIndexMap<String, Animation> {
        &self.motions
    }

    pub fn fonts(&self) -> &FxIndexMap<String, FontFace> {
        &self.fonts
    }

    pub fn scope_manager(&self) -> &ScopeManager {
        &self.scope_manager
    }

    /// Nothing to render
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
            && self.animations.is_empty()
            && self.motions.is_empty()
            && self.fonts.is_empty()
    }

    /// Get the named collection, creating it if absent
    pub fn activate_collection(&mut self, name: &str) -> &mut Collection {
        self.scope_manager.activate_collection(name)
    }

    /// View over the active scope
    pub fn scope(&mut self) -> ScopeWrapper<'_> {
        ScopeWrapper { store: self }
    }

    /// Add `property: value` to every selector in `selectors`
    ///
    /// Earlier values for the same property are kept; the renderer picks one.
    pub fn add_style<S: AsRef<str>>(&mut self, selectors: &[S], property: &str, value: &str) {
        for selector in selectors {
            for selector in selector_list(selector.as_ref()) {
                self.styles
                    .entry(selector.to_string())
                    .or_default()
                    .entry(property.to_string())
                    .or_default()
                    .push(value.to_string());
            }
        }
    }

    pub fn add_keyframe(&mut self, name: &str, label: &str, property: &str, value: &str) {
        self.animations
            .entry(name.to_string())
            .or_default()
            .entry(label.to_string())
            .or_default()
            .insert(property.to_string(), value.to_string());
    }

    pub fn add_motion(&mut self, name: &str, label: &str, property: &str, value: &str) {
        self.motions
            .entry(name.to_string())
            .or_default()
            .entry(label.to_string())
            .or_default()
            .insert(property.to_string(), value.to_string());
    }

    pub fn add_font(&mut self, family: &str, font: FontFace) {
        self.fonts.insert(family.to_string(), font);
    }

    /// Declarations of class `name`: the `.name` rule, else a rule literally named `name`
    fn class_declarations(&self, name: &str) -> Option<Vec<(String, StyleValues)>> {
        let style = self
            .styles
            .get(&format!(".{}", name))
            .or_else(|| self.styles.get(name))?;
        Some(style.iter().map(|(p, v)| (p.clone(), v.clone())).collect())
    }

    /// Copy declarations onto every selector of a list
    ///
    /// Appended values dominate what the selector already had; prepended
    /// values only fill properties it does not declare itself.
    fn copy_declarations(
        &mut self,
        selectors: &str,
        declarations: &[(String, StyleValues)],
        prepend: bool,
    ) {
        for selector in selector_list(selectors) {
            let style = self.styles.entry(selector.to_string()).or_default();
            for (property, values) in declarations {
                let existing = style.entry(property.clone()).or_default();
                if prepend {
                    existing.insert_many(0, values.iter().cloned());
                } else {
                    existing.extend(values.iter().cloned());
                }
            }
        }
    }
}

/// The active scope, seen through the store that owns it
pub struct ScopeWrapper<'a> {
    store: &'a mut Store,
}

impl ScopeWrapper<'_> {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.store.scope_manager.get(name)
    }

    pub fn get_path(&self, path: &str) -> Option<&str> {
        self.store.scope_manager.get_path(path)
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.store.scope_manager.set(name, value);
    }

    pub fn set_default(&mut self, name: &str, value: &str) {
        self.store.scope_manager.set_default(name, value);
    }

    pub fn set_type(&mut self, kind: &str) {
        self.store.scope_manager.set_type(kind);
    }

    /// Switch to a scope backed by `collection`
    pub fn update(&mut self, collection: &str) {
        self.store.scope_manager.enter(collection);
    }

    pub fn load_collections<S: AsRef<str>>(&mut self, names: &[S]) {
        self.store.scope_manager.load_collections(names);
    }

    /// Copy class `class_name`'s declarations onto `target` (a selector list)
    ///
    /// Returns false when the class is unknown.
    pub fn apply_class(&mut self, target: &str, class_name: &str) -> bool {
        match self.store.class_declarations(class_name) {
            Some(declarations) => {
                self.store.copy_declarations(target, &declarations, false);
                true
            }
            None => false,
        }
    }

    /// Compose class `class_name` into class `target_class`
    ///
    /// The target keeps its own declarations dominant; a class extending
    /// itself is left as is. Returns false when `class_name` is unknown.
    pub fn extend_class(&mut self, target_class: &str, class_name: &str) -> bool {
        let Some(declarations) = self.store.class_declarations(class_name) else {
            return false;
        };
        if target_class != class_name {
            let target = format!(".{}", target_class);
            self.store.copy_declarations(&target, &declarations, true);
        }
        true
    }
}
