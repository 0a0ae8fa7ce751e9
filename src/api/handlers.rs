//! Game API endpoint handlers
//!
//! - GET /api/gen_world - Generate a world from a description
//! - POST /api/render_object - Render an object as HTML
//! - POST /api/interact - List interactions for an object
//! - POST /api/do_interaction - Compute the effects of an interaction
//! - POST /api/game_tick - Compute the effects of one tick

use axum::{extract::State, Json};
use tracing::info;
use validator::Validate;

use crate::api::error::ApiError;
use crate::api::middleware::{ApiJson, ApiQuery};
use crate::api::response::{
    DoInteractionRequest, GameTickRequest, GenWorldQuery, InteractionsResponse, ObjectRequest,
    RenderObjectResponse,
};
use crate::api::ApiState;
use crate::world::{Effects, World};

/// GET /api/gen_world
pub async fn gen_world(
    State(state): State<ApiState>,
    ApiQuery(query): ApiQuery<GenWorldQuery>,
) -> Result<Json<World>, ApiError> {
    query.validate()?;
    if query.world_desc.trim().is_empty() {
        return Err(ApiError::InvalidInput(
            "World description must not be blank".to_string(),
        ));
    }

    let world = state.gateway.generate_world(&query.world_desc).await?;

    info!(objects = world.objects.len(), "World generated");

    Ok(Json(world))
}

/// POST /api/render_object
pub async fn render_object(
    State(state): State<ApiState>,
    ApiJson(payload): ApiJson<ObjectRequest>,
) -> Result<Json<RenderObjectResponse>, ApiError> {
    let html = state
        .gateway
        .render_object(&payload.world, &payload.object)
        .await?;

    Ok(Json(RenderObjectResponse { html }))
}

/// POST /api/interact
pub async fn interact(
    State(state): State<ApiState>,
    ApiJson(payload): ApiJson<ObjectRequest>,
) -> Result<Json<InteractionsResponse>, ApiError> {
    let interactions = state
        .gateway
        .list_interactions(&payload.world, &payload.object)
        .await?;

    Ok(Json(InteractionsResponse { interactions }))
}

/// POST /api/do_interaction
pub async fn do_interaction(
    State(state): State<ApiState>,
    ApiJson(payload): ApiJson<DoInteractionRequest>,
) -> Result<Json<Effects>, ApiError> {
    let effects = state
        .gateway
        .apply_interaction(&payload.world, &payload.object, &payload.interaction)
        .await?;

    info!(
        object = %payload.object.name,
        interaction = %payload.interaction.name,
        "Interaction resolved"
    );

    Ok(Json(effects))
}

/// POST /api/game_tick
pub async fn game_tick(
    State(state): State<ApiState>,
    ApiJson(payload): ApiJson<GameTickRequest>,
) -> Result<Json<Effects>, ApiError> {
    let effects = state.gateway.advance_tick(&payload.world).await?;
    Ok(Json(effects))
}
