//! Registry builder, built registry and edge validation.

use crate::model::visibility::{default_options, VisibilityOption};
use log::debug;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Extension hook receiving the current options and returning the next set.
pub type RegistryExtension = Box<dyn Fn(Vec<VisibilityOption>) -> Vec<VisibilityOption>>;

/// Collects ordered extensions and produces a [`VisibilityRegistry`].
pub struct VisibilityRegistryBuilder {
    base: Vec<VisibilityOption>,
    extensions: Vec<RegistryExtension>,
}

impl Default for VisibilityRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityRegistryBuilder {
    /// Starts from the built-in `public|private|hidden` set.
    pub fn new() -> Self {
        Self::with_base(default_options())
    }

    /// Starts from a caller-provided base set instead of the defaults.
    pub fn with_base(base: Vec<VisibilityOption>) -> Self {
        Self {
            base,
            extensions: Vec::new(),
        }
    }

    /// Appends one extension. Extensions run in registration order.
    pub fn with_extension<F>(mut self, extension: F) -> Self
    where
        F: Fn(Vec<VisibilityOption>) -> Vec<VisibilityOption> + 'static,
    {
        self.extensions.push(Box::new(extension));
        self
    }

    pub fn extension_count(&self) -> usize {
        self.extensions.len()
    }

    /// Applies all extensions and freezes the resulting option set.
    pub fn build(&self) -> VisibilityRegistry {
        let mut options = self.base.clone();
        for extension in &self.extensions {
            options = extension(options);
        }
        let registry = VisibilityRegistry::from_options(options);
        debug!(
            "event=registry_build module=registry status=ok extensions={} options={}",
            self.extensions.len(),
            registry.len()
        );
        registry
    }
}

/// Extension that upserts a fixed list of options.
///
/// Existing ids are relabeled in place; new ids are appended.
pub fn options_extension(
    additions: Vec<VisibilityOption>,
) -> impl Fn(Vec<VisibilityOption>) -> Vec<VisibilityOption> {
    move |mut options| {
        for addition in &additions {
            match options.iter_mut().find(|option| option.id == addition.id) {
                Some(existing) => existing.label = addition.label.clone(),
                None => options.push(addition.clone()),
            }
        }
        options
    }
}

/// Frozen, ordered visibility vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityRegistry {
    options: Vec<VisibilityOption>,
}

impl Default for VisibilityRegistry {
    fn default() -> Self {
        VisibilityRegistryBuilder::new().build()
    }
}

impl VisibilityRegistry {
    fn from_options(raw: Vec<VisibilityOption>) -> Self {
        let mut options: Vec<VisibilityOption> = Vec::with_capacity(raw.len());
        let mut positions: HashMap<String, usize> = HashMap::new();
        for option in raw {
            let id = option.id.trim();
            if id.is_empty() {
                continue;
            }
            match positions.get(id) {
                Some(&index) => options[index].label = option.label,
                None => {
                    positions.insert(id.to_string(), options.len());
                    options.push(VisibilityOption::new(id, option.label));
                }
            }
        }
        Self { options }
    }

    /// Options in display order.
    pub fn options(&self) -> &[VisibilityOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&VisibilityOption> {
        self.options.iter().find(|option| option.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns the label for `id`, or `sentinel` when `id` is empty or unknown.
    ///
    /// Lookup is exact: a padded id such as `" public "` is unknown.
    pub fn label_for<'a>(&'a self, id: &str, sentinel: &'a str) -> &'a str {
        if id.is_empty() {
            return sentinel;
        }
        self.get(id)
            .map(|option| option.label.as_str())
            .unwrap_or(sentinel)
    }

    /// Checks a submitted value against the current vocabulary.
    pub fn validate(&self, value: &str) -> Result<&VisibilityOption, InvalidOption> {
        let normalized = value.trim();
        self.get(normalized)
            .ok_or_else(|| InvalidOption(normalized.to_string()))
    }
}

/// Submitted value does not match any registered option id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidOption(pub String);

impl Display for InvalidOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "visibility option is not registered: `{}`", self.0)
    }
}

impl Error for InvalidOption {}
