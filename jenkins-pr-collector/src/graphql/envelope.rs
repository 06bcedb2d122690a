//! GraphQL request and response envelopes.

use serde::{Deserialize, Serialize};

/// Request body posted to the GraphQL endpoint.
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    /// GraphQL document.
    pub query: &'a str,
    /// Named variables for the document.
    pub variables: serde_json::Value,
}

/// Outer response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    /// Query result, absent or null when the query failed.
    #[serde(default)]
    pub data: Option<serde_json::Value>,

    /// Errors reported by the server.
    #[serde(default)]
    pub errors: Vec<GraphQlServerError>,
}

/// One entry of the `errors[]` array.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlServerError {
    /// Human readable message.
    pub message: String,
}
