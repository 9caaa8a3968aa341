use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of resolving a character name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CharacterSearchDto {
    /// Nexon character identifier
    pub ocid: String,
    /// Whether the OCID was newly added to the refresh list
    pub registered: bool,
}
