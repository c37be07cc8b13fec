//! Query parameter types for API handlers.

use serde::Deserialize;

/// `GET /?search=` product listing filter.
#[derive(Debug, Default, Deserialize)]
pub struct ProductSearchParams {
    pub search: Option<String>,
}
