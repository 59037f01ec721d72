use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Persisted state of a document
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq, Eq)]
pub struct DocumentResponse {
    pub id: String,
    pub content: String,
}
