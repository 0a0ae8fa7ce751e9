//! API request and response bodies

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::world::{ObjectInteraction, World, WorldObject};

/// Query string of `GET /api/gen_world`
#[derive(Debug, Deserialize, Validate)]
pub struct GenWorldQuery {
    #[validate(length(min = 1, max = 4000, message = "World description must be 1-4000 characters"))]
    pub world_desc: String,
}

/// Body carrying a world and one of its objects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRequest {
    pub world: World,
    pub object: WorldObject,
}

/// Body of `POST /api/do_interaction`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoInteractionRequest {
    pub world: World,
    pub object: WorldObject,
    pub interaction: ObjectInteraction,
}

/// Body of `POST /api/game_tick`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameTickRequest {
    pub world: World,
}

/// Rendered object markup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderObjectResponse {
    pub html: String,
}

/// Interactions available on an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionsResponse {
    pub interactions: Vec<ObjectInteraction>,
}
