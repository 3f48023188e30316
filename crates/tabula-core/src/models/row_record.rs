use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Column name to cell value for one data row, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowData(pub IndexMap<String, String>);

impl RowData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl FromIterator<(String, String)> for RowData {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        RowData(iter.into_iter().collect())
    }
}

/// One persisted data row of an upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowRecord {
    pub id: Uuid,
    pub upload_id: Uuid,
    pub row_data: RowData,
    pub row_number: i32,
    pub is_valid: bool,
    pub validation_errors: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRowRecord {
    pub upload_id: Uuid,
    pub row_data: RowData,
    pub row_number: i32,
    pub is_valid: bool,
    pub validation_errors: Option<Vec<String>>,
}

/// Row as returned by the API. `is_valid` is rendered as `"true"` / `"false"`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RowRecordResponse {
    pub id: Uuid,
    pub row_number: i32,
    #[schema(value_type = Object)]
    pub row_data: RowData,
    #[serde(with = "bool_as_string")]
    #[schema(value_type = String, example = "true")]
    pub is_valid: bool,
    pub validation_errors: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl From<RowRecord> for RowRecordResponse {
    fn from(record: RowRecord) -> Self {
        RowRecordResponse {
            id: record.id,
            row_number: record.row_number,
            row_data: record.row_data,
            is_valid: record.is_valid,
            validation_errors: record.validation_errors,
            created_at: record.created_at,
        }
    }
}

mod bool_as_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(D::Error::custom(format!(
                "expected \"true\" or \"false\", got {other:?}"
            ))),
        }
    }
}
