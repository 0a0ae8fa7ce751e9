//! Advisory checks on model-generated worlds
//!
//! Worlds are never rejected for these issues; callers log them.

use std::collections::HashSet;
use std::fmt;

use super::model::{World, GAME_STATE_OBJECT, PLAYER_OBJECT};

/// Structural problem found in a world
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldIssue {
    /// More than one object carries this name
    DuplicateName(String),
    /// A required object is absent
    MissingObject(&'static str),
}

impl fmt::Display for WorldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldIssue::DuplicateName(name) => write!(f, "object name '{}' is not unique", name),
            WorldIssue::MissingObject(name) => write!(f, "world has no '{}' object", name),
        }
    }
}

impl World {
    /// List the intended invariants this world breaks
    pub fn audit(&self) -> Vec<WorldIssue> {
        let mut issues = Vec::new();

        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for obj in &self.objects {
            if !seen.insert(obj.name.as_str()) && reported.insert(obj.name.as_str()) {
                issues.push(WorldIssue::DuplicateName(obj.name.clone()));
            }
        }

        for required in [PLAYER_OBJECT, GAME_STATE_OBJECT] {
            if self.object(required).is_none() {
                issues.push(WorldIssue::MissingObject(required));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WorldObject;

    #[test]
    fn test_complete_world_has_no_issues() {
        let world = World::new(vec![
            WorldObject::new("tree"),
            WorldObject::new("player"),
            WorldObject::new("game_state"),
        ]);
        assert!(world.audit().is_empty());
    }

    #[test]
    fn test_duplicates_reported_once() {
        let world = World::new(vec![
            WorldObject::new("player"),
            WorldObject::new("game_state"),
            WorldObject::new("goblin"),
            WorldObject::new("goblin"),
            WorldObject::new("goblin"),
        ]);
        assert_eq!(
            world.audit(),
            vec![WorldIssue::DuplicateName("goblin".to_string())]
        );
    }

    #[test]
    fn test_missing_required_objects() {
        let world = World::new(vec![WorldObject::new("tree")]);
        let issues = world.audit();
        assert_eq!(
            issues,
            vec![
                WorldIssue::MissingObject("player"),
                WorldIssue::MissingObject("game_state"),
            ]
        );
        assert_eq!(issues[0].to_string(), "world has no 'player' object");
    }
}
