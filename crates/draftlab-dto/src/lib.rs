//! Wire request/response documents for the prediction and recommendation
//! surface (spec.md §6 item 5). Field names and semantics here are fixed
//! by spec.md §4.8/§4.9; the HTTP transport that serializes them is an
//! external collaborator out of scope for this crate.
mod error;
mod predict;
mod recommend;

pub use error::ErrorResponse;
pub use predict::PredictRequest;
pub use predict::PredictResponse;
pub use recommend::RecommendMode;
pub use recommend::RecommendRequest;
pub use recommend::RecommendResponse;
