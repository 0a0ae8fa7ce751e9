//! Game world payloads
//!
//! The world is owned by the client and travels with every request. This
//! module holds the serde types exchanged with both the client and the model,
//! plus helpers to inspect a world and apply an effect bundle to it.

pub mod effects;
pub mod model;
pub mod validator;

pub use effects::{DeleteObject, DisplayMessage, Effects};
pub use model::{Metadata, ObjectInteraction, World, WorldObject};
pub use validator::WorldIssue;
