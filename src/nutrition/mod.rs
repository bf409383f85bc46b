pub mod client;
mod dto;
pub mod handlers;

use axum::Router;

use crate::state::AppState;

pub use client::{NutritionSource, OpenPetFoodFacts};
pub use dto::NutritionRecord;

pub fn router() -> Router<AppState> {
    handlers::product_routes()
}
