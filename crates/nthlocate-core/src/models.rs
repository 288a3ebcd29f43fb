use serde::{Deserialize, Serialize};

pub const TEXT_RECORD_TABLE: &str = "text_record";
pub const STRING_PROPERTY: &str = "string_property";

/// The persisted record whose string property is searched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub string_property: String,
}

impl TextRecord {
    pub fn new(string_property: impl Into<String>) -> Self {
        Self {
            id: None,
            string_property: string_property.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocateResult {
    pub backend: String,
    pub occurrence: u32,
    pub expression: String,
    pub position: Option<i64>,
}
