//! A narrow read-only view onto a hierarchical configuration tree.
//!
//! The topology builders depend only on the [`ConfigView`] capability, not on
//! any particular configuration backend. [`ConfigTree`] is the provided
//! implementation over the `config` crate's value tree.

use config::{Value, ValueKind};

/// Read access to a hierarchical key/value tree.
///
/// Paths are dot-separated and relative to the view. Child iteration follows
/// declaration order of the underlying source, which the builders rely on for
/// deterministic topology output.
pub trait ConfigView: Sized {
    /// Returns the boolean at `path`, if present and boolean-like.
    fn get_bool(&self, path: &str) -> Option<bool>;

    /// Returns the string at `path`, if present.
    fn get_string(&self, path: &str) -> Option<String>;

    /// Returns the list of strings at `path`, if present and list-shaped.
    fn get_string_list(&self, path: &str) -> Option<Vec<String>>;

    /// Returns the named children of the collection at `path`, in declaration
    /// order. Missing or non-collection paths yield an empty list.
    fn children(&self, path: &str) -> Vec<(String, Self)>;
}

/// A [`ConfigView`] over an in-memory `config` crate value tree.
#[derive(Debug, Clone)]
pub struct ConfigTree(Value);

impl ConfigTree {
    /// Wraps an already-built configuration value.
    pub fn new(root: Value) -> Self {
        Self(root)
    }

    /// Parses a YAML document into a tree view.
    pub fn from_yaml_str(source: &str) -> Result<Self, config::ConfigError> {
        let root = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Yaml))
            .build()?
            .try_deserialize::<Value>()?;
        Ok(Self(root))
    }

    /// Descends the tree along a dot-separated path.
    fn lookup(&self, path: &str) -> Option<&Value> {
        let mut current = &self.0;
        for segment in path.split('.') {
            match &current.kind {
                ValueKind::Table(table) => current = table.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }
}

impl ConfigView for ConfigTree {
    fn get_bool(&self, path: &str) -> Option<bool> {
        self.lookup(path)?.clone().into_bool().ok()
    }

    fn get_string(&self, path: &str) -> Option<String> {
        match &self.lookup(path)?.kind {
            ValueKind::String(value) => Some(value.clone()),
            _ => None,
        }
    }

    fn get_string_list(&self, path: &str) -> Option<Vec<String>> {
        let items = self.lookup(path)?.clone().into_array().ok()?;
        items.into_iter().map(|item| item.into_string().ok()).collect()
    }

    fn children(&self, path: &str) -> Vec<(String, Self)> {
        match self.lookup(path).map(|value| &value.kind) {
            Some(ValueKind::Table(table)) => table
                .iter()
                .map(|(name, value)| (name.clone(), Self(value.clone())))
                .collect(),
            _ => Vec::new(),
        }
    }
}
