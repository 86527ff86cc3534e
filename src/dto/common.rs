use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic acknowledgement for mutating endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActionResponse {
    /// Always `true`; errors are reported through the error body instead.
    pub ok: bool,
}

impl ActionResponse {
    /// Successful acknowledgement.
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Word category names available for game setup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoriesResponse {
    /// Category names in configured order.
    pub categories: Vec<String>,
}
