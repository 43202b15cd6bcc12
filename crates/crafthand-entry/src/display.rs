//! Recipe displays and their serialized form.
//!
//! A display is what the recipe browser shows and what a client sends back
//! when asking the server to fill a crafting grid.

use crafthand_common::{CategoryId, Identifier, MagicBytes, SchemaVersion};
use serde::{Deserialize, Serialize};

use crate::entry::{EntryStack, SerializedEntry};
use crate::error::{EntryError, EntryResult};
use crate::ingredient::EntryIngredient;
use crate::registry::EntryRegistry;

/// A recipe as shown to the player: ordered inputs and outputs.
#[derive(Debug, Clone)]
pub struct Display {
    category: CategoryId,
    inputs: Vec<EntryIngredient>,
    outputs: Vec<EntryStack>,
    location: Option<Identifier>,
}

impl Display {
    /// Creates a display with no inputs or outputs.
    #[must_use]
    pub fn new(category: CategoryId) -> Self {
        Self {
            category,
            inputs: Vec::new(),
            outputs: Vec::new(),
            location: None,
        }
    }

    /// Appends an input slot.
    #[must_use]
    pub fn with_input(mut self, ingredient: EntryIngredient) -> Self {
        self.inputs.push(ingredient);
        self
    }

    /// Appends several input slots.
    #[must_use]
    pub fn with_inputs(mut self, ingredients: impl IntoIterator<Item = EntryIngredient>) -> Self {
        self.inputs.extend(ingredients);
        self
    }

    /// Appends an output.
    #[must_use]
    pub fn with_output(mut self, output: EntryStack) -> Self {
        self.outputs.push(output);
        self
    }

    /// Tags the display with the recipe it came from.
    #[must_use]
    pub fn with_location(mut self, location: Identifier) -> Self {
        self.location = Some(location);
        self
    }

    /// Returns the category.
    #[must_use]
    pub fn category(&self) -> &CategoryId {
        &self.category
    }

    /// Returns the input slots in order.
    #[must_use]
    pub fn inputs(&self) -> &[EntryIngredient] {
        &self.inputs
    }

    /// Returns the outputs in order.
    #[must_use]
    pub fn outputs(&self) -> &[EntryStack] {
        &self.outputs
    }

    /// Returns the source recipe identifier.
    #[must_use]
    pub fn location(&self) -> Option<&Identifier> {
        self.location.as_ref()
    }

    /// Writes the display in its serialized form.
    pub fn save(&self) -> EntryResult<SerializedDisplay> {
        let inputs = self
            .inputs
            .iter()
            .map(|ingredient| {
                ingredient
                    .iter()
                    .map(EntryStack::save)
                    .collect::<EntryResult<Vec<_>>>()
            })
            .collect::<EntryResult<Vec<_>>>()?;
        let outputs = self
            .outputs
            .iter()
            .map(EntryStack::save)
            .collect::<EntryResult<Vec<_>>>()?;
        Ok(SerializedDisplay {
            version: SchemaVersion::DISPLAY_FORMAT,
            category: self.category.clone(),
            inputs,
            outputs,
            location: self.location.clone(),
        })
    }

    /// Rebuilds a display, resolving entry types through `registry`.
    pub fn read(registry: &EntryRegistry, serialized: &SerializedDisplay) -> EntryResult<Self> {
        SchemaVersion::DISPLAY_FORMAT.ensure_readable(&serialized.version)?;
        let inputs = serialized
            .inputs
            .iter()
            .map(|alternatives| {
                alternatives
                    .iter()
                    .map(|entry| registry.read_entry(entry))
                    .collect::<EntryResult<Vec<_>>>()
                    .map(EntryIngredient::of)
            })
            .collect::<EntryResult<Vec<_>>>()?;
        let outputs = serialized
            .outputs
            .iter()
            .map(|entry| registry.read_entry(entry))
            .collect::<EntryResult<Vec<_>>>()?;
        Ok(Self {
            category: serialized.category.clone(),
            inputs,
            outputs,
            location: serialized.location.clone(),
        })
    }
}

/// Serialized display, as stored or sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedDisplay {
    /// Format version
    pub version: SchemaVersion,
    /// Recipe category
    pub category: CategoryId,
    /// Alternatives per input slot
    pub inputs: Vec<Vec<SerializedEntry>>,
    /// Outputs
    pub outputs: Vec<SerializedEntry>,
    /// Source recipe identifier
    #[serde(default)]
    pub location: Option<Identifier>,
}

impl SerializedDisplay {
    /// Encodes as magic bytes followed by JSON.
    pub fn to_bytes(&self) -> EntryResult<Vec<u8>> {
        let json =
            serde_json::to_vec(self).map_err(|e| EntryError::Serialization(e.to_string()))?;
        let mut bytes = Vec::with_capacity(json.len() + MagicBytes::DISPLAY.0.len());
        bytes.extend_from_slice(&MagicBytes::DISPLAY.0);
        bytes.extend_from_slice(&json);
        Ok(bytes)
    }

    /// Decodes bytes written by [`SerializedDisplay::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> EntryResult<Self> {
        let json = MagicBytes::DISPLAY.strip(bytes)?;
        serde_json::from_slice(json).map_err(|e| EntryError::Deserialization(e.to_string()))
    }
}
