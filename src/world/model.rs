//! World, object and interaction types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open metadata attached to an object. The model decides its shape.
pub type Metadata = Map<String, Value>;

/// Name of the object that represents the player
pub const PLAYER_OBJECT: &str = "player";

/// Name of the object that carries global game variables
pub const GAME_STATE_OBJECT: &str = "game_state";

/// Name of the interaction that lets the player type a free-form command
pub const CUSTOM_INTERACTION: &str = "custom";

/// A named object in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    /// Unique name within the world
    pub name: String,
    /// Arbitrary JSON object describing the object's state
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl WorldObject {
    /// Create an object without metadata
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: None,
        }
    }

    /// Create an object with the given metadata
    pub fn with_metadata(name: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            name: name.into(),
            metadata: Some(metadata),
        }
    }

    /// Look up a metadata value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.metadata.as_ref().and_then(|m| m.get(key))
    }
}

/// The complete game state: an ordered list of objects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub objects: Vec<WorldObject>,
}

impl World {
    /// Create a world from a list of objects
    pub fn new(objects: Vec<WorldObject>) -> Self {
        Self { objects }
    }

    /// Find an object by name
    pub fn object(&self, name: &str) -> Option<&WorldObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Find an object by name, mutably
    pub fn object_mut(&mut self, name: &str) -> Option<&mut WorldObject> {
        self.objects.iter_mut().find(|o| o.name == name)
    }

    /// Object names in world order
    pub fn names(&self) -> Vec<&str> {
        self.objects.iter().map(|o| o.name.as_str()).collect()
    }

    /// The player object, if present
    pub fn player(&self) -> Option<&WorldObject> {
        self.object(PLAYER_OBJECT)
    }

    /// The game_state object, if present
    pub fn game_state(&self) -> Option<&WorldObject> {
        self.object(GAME_STATE_OBJECT)
    }
}

/// An action the player can perform on an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInteraction {
    /// Identifier of the interaction
    pub name: String,
    /// Label shown to the player
    pub display_name: String,
    /// Questions the player answers to complete the interaction
    #[serde(default)]
    pub arguments: Option<Vec<String>>,
}

impl ObjectInteraction {
    /// The always-available free-form interaction
    pub fn custom() -> Self {
        Self {
            name: CUSTOM_INTERACTION.to_string(),
            display_name: "Custom".to_string(),
            arguments: Some(vec!["What do you want to do?".to_string()]),
        }
    }
}
