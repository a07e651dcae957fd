//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Deserializer, Serialize};

use grocery_core::item::quantity_from_json;
use grocery_core::GroceryItem;

use crate::error::ApiError;
use crate::AppState;

/// Response carrying a confirmation message
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: String) -> Json<Self> {
        Json(Self { message })
    }
}

/// Response for the full list
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub items: Vec<GroceryItem>,
}

/// Request to add an item
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub name: String,
    pub quantity: serde_json::Number,
}

/// Add an item to the list
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddItemRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload?;
    let quantity = quantity_from_json(&request.quantity)?;

    let item = state.list.add_item(&request.name, quantity)?;

    Ok(MessageResponse::new(format!(
        "Item '{}' with quantity {} added to grocery list!",
        item.name, item.quantity
    )))
}

/// Request to delete an item
#[derive(Debug, Deserialize)]
pub struct DeleteItemRequest {
    pub name: String,
}

/// Delete an item; missing items are deleted just the same
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DeleteItemRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload?;

    state.list.delete_item(&request.name)?;

    Ok(MessageResponse::new(format!(
        "Item '{}' deleted from grocery list!",
        request.name
    )))
}

/// Get every item on the list
pub async fn get_list(State(state): State<Arc<AppState>>) -> Result<Json<ListResponse>, ApiError> {
    let items = state.list.items()?;
    Ok(Json(ListResponse { items }))
}

/// An optional flag that, when present, must be a boolean; `null` is rejected
fn present_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    bool::deserialize(deserializer).map(Some)
}

/// Request to update an item
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: String,
    pub quantity: serde_json::Number,
    #[serde(default, deserialize_with = "present_bool")]
    pub status: Option<bool>,
}

/// Overwrite an item with the given quantity and status
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UpdateItemRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload?;
    let quantity = quantity_from_json(&request.quantity)?;

    let item = state
        .list
        .update_item(&request.name, quantity, request.status)?;

    Ok(MessageResponse::new(format!(
        "Item '{}' updated with quantity {} and marked as {}!",
        item.name,
        item.quantity,
        item.status_label()
    )))
}

/// Request to rename an item
#[derive(Debug, Deserialize)]
pub struct RenameItemRequest {
    /// Current name
    pub from: String,
    /// New name
    pub name: String,
    pub quantity: serde_json::Number,
    #[serde(default, deserialize_with = "present_bool")]
    pub status: Option<bool>,
}

/// Move an item to a new name, replacing its quantity and status
pub async fn rename_item(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RenameItemRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload?;
    let quantity = quantity_from_json(&request.quantity)?;

    let item = state
        .list
        .rename_item(&request.from, &request.name, quantity, request.status)?;

    Ok(MessageResponse::new(format!(
        "Item '{}' renamed to '{}' with quantity {}!",
        request.from, item.name, item.quantity
    )))
}

/// Liveness check
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "backend": state.list.backend()
    }))
}
