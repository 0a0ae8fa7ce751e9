//! Effect bundles proposed by the model for an interaction or a tick

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::model::{World, WorldObject};

/// Reference to an object that should be removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteObject {
    pub name: String,
}

/// Message shown to the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMessage {
    pub message: String,
}

/// Set of world mutations. Every list is optional; the model omits the
/// effects it does not use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    #[serde(default)]
    pub delete_objects: Option<Vec<DeleteObject>>,
    #[serde(default)]
    pub create_objects: Option<Vec<WorldObject>>,
    #[serde(default)]
    pub overwrite_metadata: Option<Vec<WorldObject>>,
    #[serde(default)]
    pub display_messages: Option<Vec<DisplayMessage>>,
}

impl Effects {
    /// True when the bundle changes nothing and says nothing
    pub fn is_empty(&self) -> bool {
        fn empty<T>(list: &Option<Vec<T>>) -> bool {
            list.as_ref().map_or(true, Vec::is_empty)
        }

        empty(&self.delete_objects)
            && empty(&self.create_objects)
            && empty(&self.overwrite_metadata)
            && empty(&self.display_messages)
    }

    /// Messages in the order the model produced them
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.display_messages
            .iter()
            .flatten()
            .map(|m| m.message.as_str())
    }
}

impl World {
    /// Apply an effect bundle and return the messages to display.
    ///
    /// Deletions run first, then creations (a created object replaces any
    /// object with the same name), then metadata overwrites. Overwrites merge
    /// key by key; a `null` value removes the key. Names that do not exist are
    /// skipped.
    pub fn apply(&mut self, effects: &Effects) -> Vec<String> {
        if let Some(deletes) = &effects.delete_objects {
            self.objects
                .retain(|obj| !deletes.iter().any(|d| d.name == obj.name));
        }

        if let Some(creates) = &effects.create_objects {
            for created in creates {
                match self.object_mut(&created.name) {
                    Some(existing) => *existing = created.clone(),
                    None => self.objects.push(created.clone()),
                }
            }
        }

        if let Some(overwrites) = &effects.overwrite_metadata {
            for overwrite in overwrites {
                let Some(target) = self.object_mut(&overwrite.name) else {
                    continue;
                };
                let Some(patch) = &overwrite.metadata else {
                    continue;
                };

                let metadata = target.metadata.get_or_insert_with(Default::default);
                for (key, value) in patch {
                    if value == &Value::Null {
                        metadata.remove(key);
                    } else {
                        metadata.insert(key.clone(), value.clone());
                    }
                }
            }
        }

        effects.messages().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn crafting_world() -> World {
        serde_json::from_value(json!({
            "objects": [
                {"name": "stick", "metadata": {"length": 3}},
                {"name": "rock", "metadata": null},
                {"name": "player", "metadata": {"has_crafted": false, "hunger": 2}},
                {"name": "game_state", "metadata": {"has_won": false}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_partial_bundle() {
        let effects: Effects = serde_json::from_value(json!({
            "display_messages": [{"message": "Nothing happens."}]
        }))
        .unwrap();

        assert!(effects.delete_objects.is_none());
        assert!(effects.create_objects.is_none());
        assert!(!effects.is_empty());
        assert_eq!(effects.messages().collect::<Vec<_>>(), vec!["Nothing happens."]);
    }

    #[test]
    fn test_empty_bundle() {
        let effects: Effects = serde_json::from_value(json!({
            "delete_objects": [],
            "display_messages": null
        }))
        .unwrap();
        assert!(effects.is_empty());
    }

    #[test]
    fn test_apply_crafting_effects() {
        let mut world = crafting_world();
        let effects: Effects = serde_json::from_value(json!({
            "delete_objects": [{"name": "stick"}, {"name": "rock"}],
            "create_objects": [{"name": "axe", "metadata": {"color": "brown"}}],
            "overwrite_metadata": [
                {"name": "player", "metadata": {"has_crafted": true, "hunger": null}}
            ],
            "display_messages": [{"message": "Congrats!"}]
        }))
        .unwrap();

        let messages = world.apply(&effects);

        assert_eq!(messages, vec!["Congrats!".to_string()]);
        assert_eq!(world.names(), vec!["player", "game_state", "axe"]);

        let player = world.player().unwrap();
        assert_eq!(player.get("has_crafted"), Some(&json!(true)));
        assert_eq!(player.get("hunger"), None);
    }

    #[test]
    fn test_apply_create_replaces_and_unknown_overwrite_skipped() {
        let mut world = crafting_world();
        let effects: Effects = serde_json::from_value(json!({
            "create_objects": [{"name": "rock", "metadata": {"cracked": true}}],
            "overwrite_metadata": [{"name": "ghost", "metadata": {"seen": true}}]
        }))
        .unwrap();

        let messages = world.apply(&effects);

        assert!(messages.is_empty());
        assert_eq!(world.objects.len(), 4);
        assert_eq!(world.object("rock").unwrap().get("cracked"), Some(&json!(true)));
        assert!(world.object("ghost").is_none());
    }

    #[test]
    fn test_overwrite_adds_metadata_to_bare_object() {
        let mut world = crafting_world();
        let effects: Effects = serde_json::from_value(json!({
            "overwrite_metadata": [{"name": "rock", "metadata": {"weight": "heavy"}}]
        }))
        .unwrap();

        world.apply(&effects);

        assert_eq!(world.object("rock").unwrap().get("weight"), Some(&json!("heavy")));
    }
}
