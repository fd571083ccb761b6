#![warn(missing_docs)]
//! # plantcare-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `plantcare` workspace.
//!
//! ## Responsibilities
//! - Represent user profiles and prediction records as returned by the API.
//! - Model the `{ "data": ... }` response envelope and error bodies.
//! - Enforce the render invariant: records without image bytes are never shown.
//! - Provide display helpers for labels, confidence, and timestamps.
//!
//! ## Data flow
//! Raw JSON body -> [`decode_envelope`] or [`decode_renderable_list`] ->
//! typed record -> [`Validate`] ->
//! page controller state -> text rendering.
//!
//! ## Ownership and lifetimes
//! Records own their strings so they can outlive the transient response
//! buffers they were decoded from. No record is cached across page mounts.
//!
//! ## Error model
//! Decode failures and contract violations (blank ids, out-of-range
//! confidence) return [`CoreError`] values; callers treat both as a client
//! failure and never render partially decoded records.
//!
//! ## Security and privacy notes
//! Image payloads are opaque base64 text and are never logged by this crate.
//!
//! ## Example
//! ```rust
//! use plantcare_core::{format_confidence, humanize_label};
//!
//! assert_eq!(humanize_label("Tomato___Late_blight"), "Tomato   Late blight");
//! assert_eq!(format_confidence(97.456), "97.46%");
//! ```

use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

/// Upper bound of the confidence scale reported by the service.
pub const MAX_CONFIDENCE: f64 = 100.0;

/// Profile of the currently authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account email address.
    pub email: String,
    /// Display name chosen at registration.
    pub username: String,
}

/// Token payload returned by the sign-in endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    /// Opaque bearer token.
    pub token: String,
}

/// Identifier payload returned after an image submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionData {
    /// Server-assigned prediction id.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
}

/// One entry of the prediction history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSummary {
    /// Server-assigned prediction id.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Predicted disease class, underscores as word separators.
    pub disease_name: String,
    /// Short description of the disease, when provided.
    #[serde(default)]
    pub description: Option<String>,
    /// Confidence score in `[0, 100]`.
    pub confidence: f64,
    /// Prediction timestamp as sent by the server.
    pub date_predict: String,
    /// Base64 JPEG bytes of the uploaded photo.
    #[serde(default)]
    pub image: Option<String>,
}

/// Follow-up guidance attached to a detailed prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextInfo {
    /// Human-readable disease name.
    pub name: String,
    /// Explanation of what the diagnosis means.
    pub meaning: String,
    /// Ordered treatment suggestions.
    #[serde(default)]
    pub suggestion: Vec<String>,
}

/// Full prediction record returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionDetail {
    /// Server-assigned id; the detail body may omit it.
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    /// Predicted disease class, underscores as word separators.
    pub class_name: String,
    /// Confidence score in `[0, 100]`.
    pub confidence: f64,
    /// Prediction timestamp as sent by the server.
    pub prediction_time: String,
    /// Base64 JPEG bytes of the uploaded photo.
    #[serde(default)]
    pub image: Option<String>,
    /// Follow-up guidance.
    pub next_info: NextInfo,
}

/// Successful response envelope: every API body wraps its payload in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Wrapped payload.
    pub data: T,
}

/// Error body shape used by the service for rejected requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Primary human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Secondary error text some endpoints use instead of `message`.
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Returns the first non-blank server-provided message.
    pub fn server_message(&self) -> Option<&str> {
        [self.message.as_deref(), self.error.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
    }
}

/// Records that carry an optional image payload.
pub trait HasImage {
    /// Returns the raw base64 image text, if any.
    fn image(&self) -> Option<&str>;

    /// Returns `true` when the record carries non-blank image bytes.
    fn is_renderable(&self) -> bool {
        self.image().is_some_and(|image| !image.trim().is_empty())
    }
}

impl HasImage for PredictionSummary {
    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

impl HasImage for PredictionDetail {
    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

impl HasImage for serde_json::Value {
    fn image(&self) -> Option<&str> {
        self.get("image").and_then(serde_json::Value::as_str)
    }
}

/// Contract checks applied to decoded payloads before they reach views.
pub trait Validate {
    /// Checks payload invariants.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidContract`] describing the first violation.
    fn validate(&self) -> Result<(), CoreError>;
}

impl Validate for UserProfile {
    fn validate(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

impl Validate for TokenData {
    fn validate(&self) -> Result<(), CoreError> {
        require_non_blank("token", &self.token)
    }
}

impl Validate for SubmissionData {
    fn validate(&self) -> Result<(), CoreError> {
        require_non_blank("id", &self.id)
    }
}

impl Validate for PredictionSummary {
    fn validate(&self) -> Result<(), CoreError> {
        require_non_blank("id", &self.id)?;
        check_confidence(self.confidence)
    }
}

impl Validate for PredictionDetail {
    fn validate(&self) -> Result<(), CoreError> {
        check_confidence(self.confidence)
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), CoreError> {
        self.iter().try_for_each(Validate::validate)
    }
}

impl Validate for serde_json::Value {
    fn validate(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Decodes a `{ "data": T }` body and validates the payload.
///
/// # Errors
/// Returns [`CoreError::Decode`] when the body does not match the envelope
/// shape and [`CoreError::InvalidContract`] when the payload violates record
/// invariants.
pub fn decode_envelope<T>(raw: &[u8]) -> Result<T, CoreError>
where
    T: DeserializeOwned + Validate,
{
    let envelope: Envelope<T> = serde_json::from_slice(raw).map_err(CoreError::Decode)?;
    envelope.data.validate()?;
    Ok(envelope.data)
}

/// Renderable records of a list envelope plus the count of skipped entries.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableList<T> {
    /// Records carrying an image, in server order.
    pub records: Vec<T>,
    /// Entries skipped because their image was absent or blank.
    pub skipped: usize,
}

/// Decodes a `{ "data": [...] }` list body, skipping entries without a
/// renderable image before any other field is read.
///
/// Only the kept entries are decoded into `T` and validated, so a malformed
/// entry that would never be shown does not fail the list.
///
/// # Errors
/// Returns [`CoreError::Decode`] when the body is not a list envelope or a
/// kept entry does not match `T`, and [`CoreError::InvalidContract`] when a
/// kept entry violates record invariants.
pub fn decode_renderable_list<T>(raw: &[u8]) -> Result<RenderableList<T>, CoreError>
where
    T: DeserializeOwned + Validate,
{
    let envelope: Envelope<Vec<serde_json::Value>> =
        serde_json::from_slice(raw).map_err(CoreError::Decode)?;
    let total = envelope.data.len();
    let kept = retain_renderable(envelope.data);
    let skipped = total - kept.len();

    let records = kept
        .into_iter()
        .map(|entry| {
            let record: T = serde_json::from_value(entry).map_err(CoreError::Decode)?;
            record.validate()?;
            Ok(record)
        })
        .collect::<Result<Vec<T>, CoreError>>()?;

    Ok(RenderableList { records, skipped })
}

/// Decodes an error body, returning an empty body for non-JSON input.
pub fn decode_error_body(raw: &[u8]) -> ErrorBody {
    serde_json::from_slice(raw).unwrap_or_default()
}

/// Drops records that cannot be rendered because their image is missing.
pub fn retain_renderable<T: HasImage>(records: Vec<T>) -> Vec<T> {
    records
        .into_iter()
        .filter(HasImage::is_renderable)
        .collect()
}

/// Replaces underscore separators in class names with spaces.
pub fn humanize_label(label: &str) -> String {
    label.replace('_', " ")
}

/// Formats a confidence score with two decimals and a percent sign.
pub fn format_confidence(confidence: f64) -> String {
    format!("{confidence:.2}%")
}

/// Formats an RFC 3339 timestamp as `YYYY-MM-DD HH:MM:SS` in UTC.
///
/// Unparseable input is returned verbatim so a display never fails on an
/// unexpected server format.
pub fn format_timestamp(raw: &str) -> String {
    match OffsetDateTime::parse(raw, &Rfc3339) {
        Ok(parsed) => {
            let utc = parsed.to_offset(UtcOffset::UTC);
            format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                utc.year(),
                u8::from(utc.month()),
                utc.day(),
                utc.hour(),
                utc.minute(),
                utc.second()
            )
        }
        Err(_) => raw.to_string(),
    }
}

/// Decodes base64 image text into raw bytes.
///
/// # Errors
/// Returns [`CoreError::MissingImage`] for blank input and
/// [`CoreError::ImageEncoding`] for invalid base64.
pub fn decode_image(image: &str) -> Result<Vec<u8>, CoreError> {
    let trimmed = image.trim();
    if trimmed.is_empty() {
        return Err(CoreError::MissingImage);
    }

    base64::engine::general_purpose::STANDARD
        .decode(trimmed)
        .map_err(|error| CoreError::ImageEncoding(error.to_string()))
}

fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidContract(format!("{field} is empty")));
    }
    Ok(())
}

fn check_confidence(confidence: f64) -> Result<(), CoreError> {
    if !(0.0..=MAX_CONFIDENCE).contains(&confidence) {
        return Err(CoreError::InvalidContract(format!(
            "confidence {confidence} outside [0, {MAX_CONFIDENCE}]"
        )));
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Unsigned(number) => number.to_string(),
            RawId::Signed(number) => number.to_string(),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

/// Error type for payload decoding and contract validation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Body does not match the expected envelope shape.
    #[error("unexpected response shape: {0}")]
    Decode(#[source] serde_json::Error),
    /// Payload decoded but violates record invariants.
    #[error("response contract violation: {0}")]
    InvalidContract(String),
    /// Record has no image bytes.
    #[error("record has no image")]
    MissingImage,
    /// Image text is not valid base64.
    #[error("invalid image encoding: {0}")]
    ImageEncoding(String),
}
