//! Wire DTOs for the ToraxVIEW backend.
//!
//! DESIGN
//! ======
//! Every response is decoded here, at the network boundary, into typed
//! structs. Persisted rows are written by older clients too, so string fields
//! tolerate `null`, ids tolerate numbers, and list decoders skip elements that
//! do not fit instead of failing the whole view.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// SESSION
// =============================================================================

/// Role granted by the backend at login.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "radiologo")]
    Radiologist,
    #[serde(rename = "administrador")]
    Administrator,
}

impl Role {
    /// Wire string as stored in `localStorage` and returned by `/auth/login`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Radiologist => "radiologo",
            Self::Administrator => "administrador",
        }
    }

    /// Parse a wire role string. Unknown roles yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "radiologo" => Some(Self::Radiologist),
            "administrador" => Some(Self::Administrator),
            _ => None,
        }
    }

    /// Human-readable label for the header.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Radiologist => "Radiólogo",
            Self::Administrator => "Administrador",
        }
    }
}

/// Body of `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful `POST /auth/login` response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub role: String,
}

// =============================================================================
// INFERENCE
// =============================================================================

/// One labeled probability produced by the inference service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Finding name (e.g. `"Cardiomegaly"`).
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub label: String,
    /// Probability in `[0, 1]` as reported; not clamped until rendering.
    #[serde(default, deserialize_with = "deserialize_f64_or_zero")]
    pub probability: f64,
}

/// Decoded `POST /predict` response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PredictResponse {
    /// Predictions in the order the service returned them.
    pub predictions: Vec<Prediction>,
    /// Batch-level precision, when the service reports a number.
    pub precision: Option<f64>,
}

impl PredictResponse {
    /// Decode a predict response body.
    ///
    /// A `predictions` value that is not an array decodes as empty, and a
    /// non-numeric `precision` as absent.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let predictions = value.get("predictions").map(decode_predictions).unwrap_or_default();
        let precision = value.get("precision").and_then(Value::as_f64);
        Self { predictions, precision }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// A persisted diagnostic record as written by `POST /guardar_registro` and
/// read back by the list endpoints.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    /// Client-generated UUID; primary identifier of the record.
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub key: String,
    /// `YYYY-MM-DD` date the analysis ran.
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub inference_date: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub birth_date: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub gender: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub city: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub parish: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub canton: String,
    #[serde(default, deserialize_with = "deserialize_optional_f64")]
    pub precision: Option<f64>,
    /// JSON-encoded array of [`Prediction`]s.
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub resultados: String,
    /// Free-text observation written by the radiologist.
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub feedback: String,
    /// Image as a `data:` URL.
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub image: String,
}

impl DiagnosticRecord {
    /// Parsed predictions; malformed `resultados` yields an empty list.
    #[must_use]
    pub fn predictions(&self) -> Vec<Prediction> {
        parse_resultados(&self.resultados)
    }
}

/// Encode predictions into the `resultados` column format.
#[must_use]
pub fn encode_resultados(predictions: &[Prediction]) -> String {
    serde_json::to_string(predictions).unwrap_or_else(|_| "[]".to_owned())
}

/// Parse a `resultados` column. Anything but a JSON array yields `[]`.
#[must_use]
pub fn parse_resultados(raw: &str) -> Vec<Prediction> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => decode_predictions(&value),
        Err(_) => Vec::new(),
    }
}

/// Decode a record list body. Non-array bodies yield `[]`; elements that are
/// not records are skipped.
#[must_use]
pub fn parse_record_list(value: Value) -> Vec<DiagnosticRecord> {
    decode_list(value, "record")
}

// =============================================================================
// USERS
// =============================================================================

/// A radiologist account as listed by `GET /radiologos`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Radiologist {
    /// Backend id; numbers are normalized to their decimal string.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub username: String,
}

/// Decode a radiologist list body with the same leniency as records.
#[must_use]
pub fn parse_radiologist_list(value: Value) -> Vec<Radiologist> {
    decode_list(value, "radiologist")
}

/// Body of `POST /radiologos` and `PUT /radiologos/:id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserPayload {
    pub username: String,
    /// Omitted on update when the password is left blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

// =============================================================================
// EXPORT
// =============================================================================

/// Output format accepted by `GET /export/registros`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Zip,
}

impl ExportFormat {
    pub const ALL: [Self; 3] = [Self::Csv, Self::Json, Self::Zip];

    /// Query-string value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Zip => "zip",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "zip" => Some(Self::Zip),
            _ => None,
        }
    }

    /// MIME type used when the response carries none.
    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
            Self::Zip => "application/zip",
        }
    }

    /// Only ZIP archives can carry the images.
    #[must_use]
    pub fn supports_images(self) -> bool {
        matches!(self, Self::Zip)
    }
}

// =============================================================================
// DECODING HELPERS
// =============================================================================

fn decode_predictions(value: &Value) -> Vec<Prediction> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| serde_json::from_value::<Prediction>(item.clone()).ok())
        .collect()
}

fn decode_list<T: serde::de::DeserializeOwned>(value: Value, what: &str) -> Vec<T> {
    let Value::Array(items) = value else {
        log::debug!("expected {what} array, got non-array body");
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log::debug!("skipping undecodable {what}: {e}");
                None
            }
        })
        .collect()
}

fn deserialize_string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(D::Error::custom("expected string")),
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) if !s.is_empty() => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(D::Error::custom("expected non-empty string or number id")),
    }
}

fn deserialize_f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_f64(deserializer)?.unwrap_or(0.0))
}

fn deserialize_optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) => Ok(s.trim().parse::<f64>().ok()),
        _ => Ok(None),
    }
}
