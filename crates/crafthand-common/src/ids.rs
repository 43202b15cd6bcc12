//! ID types for entry types, items, fluids, and categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{CommonError, CommonResult};

/// Namespace used when an identifier is written without one.
pub const DEFAULT_NAMESPACE: &str = "crafthand";

/// Namespaced identifier of the form `namespace:path`.
///
/// Cloning is cheap; the text is shared.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    full: Arc<str>,
    split: usize,
}

impl Identifier {
    /// Creates an identifier from a namespace and a path.
    pub fn new(namespace: &str, path: &str) -> CommonResult<Self> {
        if !namespace.chars().all(is_namespace_char) || namespace.is_empty() {
            return Err(CommonError::InvalidIdentifier(format!("{namespace}:{path}")));
        }
        if !path.chars().all(is_path_char) || path.is_empty() {
            return Err(CommonError::InvalidIdentifier(format!("{namespace}:{path}")));
        }
        Ok(Self {
            full: Arc::from(format!("{namespace}:{path}")),
            split: namespace.len(),
        })
    }

    /// Creates an identifier in [`DEFAULT_NAMESPACE`] for a built-in path.
    ///
    /// The path is not validated; only pass literal, lowercase paths.
    #[must_use]
    pub fn builtin(path: &'static str) -> Self {
        Self {
            full: Arc::from(format!("{DEFAULT_NAMESPACE}:{path}")),
            split: DEFAULT_NAMESPACE.len(),
        }
    }

    /// Parses `namespace:path`, falling back to [`DEFAULT_NAMESPACE`].
    pub fn parse(text: &str) -> CommonResult<Self> {
        match text.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(DEFAULT_NAMESPACE, text),
        }
    }

    /// Returns the namespace part.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.full[..self.split]
    }

    /// Returns the path part.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.full[self.split + 1..]
    }

    /// Returns the full `namespace:path` text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

fn is_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
}

fn is_path_char(c: char) -> bool {
    is_namespace_char(c) || c == '/'
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.full)
    }
}

impl FromStr for Identifier {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = CommonError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.full.to_string()
    }
}

/// Identifier of a registered entry type (item, fluid, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryTypeId(Identifier);

impl EntryTypeId {
    /// Wraps an identifier.
    #[must_use]
    pub const fn new(id: Identifier) -> Self {
        Self(id)
    }

    /// Parses an entry type id from text.
    pub fn parse(text: &str) -> CommonResult<Self> {
        Identifier::parse(text).map(Self)
    }

    /// Returns the underlying identifier.
    #[must_use]
    pub const fn identifier(&self) -> &Identifier {
        &self.0
    }
}

impl fmt::Display for EntryTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a recipe category (crafting, smelting, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(Identifier);

impl CategoryId {
    /// Wraps an identifier.
    #[must_use]
    pub const fn new(id: Identifier) -> Self {
        Self(id)
    }

    /// Parses a category id from text.
    pub fn parse(text: &str) -> CommonResult<Self> {
        Identifier::parse(text).map(Self)
    }

    /// Returns the underlying identifier.
    #[must_use]
    pub const fn identifier(&self) -> &Identifier {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for an item kind in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates an item ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Unique identifier for a fluid kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FluidId(u32);

impl FluidId {
    /// Creates a fluid ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}
