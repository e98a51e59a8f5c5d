//! Durable offline request records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use storyloom_error::{DecodeError, StoryloomResult};
use uuid::Uuid;

/// The operation a queued request re-derives on replay.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum OfflineRequestKind {
    /// A deferred story generation
    GenerateStory,
}

/// A pending operation captured while offline.
///
/// Lives only in the queue; deleted once successfully replayed. The opaque
/// string payload holds everything needed to re-derive the original call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct OfflineRequest {
    /// Queue-local identity
    id: Uuid,
    /// Which operation to replay
    kind: OfflineRequestKind,
    /// Opaque key/value payload sufficient to re-derive the call
    payload: HashMap<String, String>,
    /// When the request was enqueued
    created_at: DateTime<Utc>,
    /// How many replay attempts have failed so far
    #[serde(default)]
    attempts: u32,
}

impl OfflineRequest {
    /// Create a request with a fresh id.
    pub fn new(kind: OfflineRequestKind, payload: HashMap<String, String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            payload,
            created_at: Utc::now(),
            attempts: 0,
        }
    }

    /// Copy of this request with the failed-attempt counter bumped.
    pub fn with_attempt_recorded(&self) -> Self {
        let mut next = self.clone();
        next.attempts += 1;
        next
    }
}

/// Typed view of a generate-story payload.
///
/// # Examples
///
/// ```
/// use storyloom_core::GenerateStoryPayload;
///
/// let payload = GenerateStoryPayload::new("entry-1", "I learned fractions today", "fantasy", "user-1", "Sam");
/// let request = payload.clone().into_request();
/// let back = GenerateStoryPayload::from_request(&request).unwrap();
/// assert_eq!(back, payload);
/// ```
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct GenerateStoryPayload {
    /// Originating journal entry id
    entry_id: String,
    /// Entry text captured at enqueue time
    entry_text: String,
    /// Requested genre tag
    genre: String,
    /// Caller identifier
    user_id: String,
    /// Name the chapter is written for
    student_name: String,
}

const KEY_ENTRY_ID: &str = "entryId";
const KEY_ENTRY_TEXT: &str = "entryText";
const KEY_GENRE: &str = "genre";
const KEY_USER_ID: &str = "userId";
const KEY_STUDENT_NAME: &str = "studentName";

impl GenerateStoryPayload {
    /// Create a payload.
    pub fn new(
        entry_id: impl Into<String>,
        entry_text: impl Into<String>,
        genre: impl Into<String>,
        user_id: impl Into<String>,
        student_name: impl Into<String>,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            entry_text: entry_text.into(),
            genre: genre.into(),
            user_id: user_id.into(),
            student_name: student_name.into(),
        }
    }

    /// Pack into a queueable request.
    pub fn into_request(self) -> OfflineRequest {
        let mut payload = HashMap::new();
        payload.insert(KEY_ENTRY_ID.to_string(), self.entry_id);
        payload.insert(KEY_ENTRY_TEXT.to_string(), self.entry_text);
        payload.insert(KEY_GENRE.to_string(), self.genre);
        payload.insert(KEY_USER_ID.to_string(), self.user_id);
        payload.insert(KEY_STUDENT_NAME.to_string(), self.student_name);
        OfflineRequest::new(OfflineRequestKind::GenerateStory, payload)
    }

    /// Unpack from a queued request.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the request is not a generate-story
    /// request or a payload key is missing.
    pub fn from_request(request: &OfflineRequest) -> StoryloomResult<Self> {
        if *request.kind() != OfflineRequestKind::GenerateStory {
            return Err(DecodeError::new(format!(
                "Expected generateStory payload, found {}",
                request.kind()
            )))?;
        }

        let field = |key: &str| -> StoryloomResult<String> {
            request.payload().get(key).cloned().ok_or_else(|| {
                DecodeError::new(format!("Offline payload missing key '{}'", key)).into()
            })
        };

        Ok(Self {
            entry_id: field(KEY_ENTRY_ID)?,
            entry_text: field(KEY_ENTRY_TEXT)?,
            genre: field(KEY_GENRE)?,
            user_id: field(KEY_USER_ID)?,
            student_name: field(KEY_STUDENT_NAME)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_round_trips_through_a_request() {
        let payload =
            GenerateStoryPayload::new("entry-9", "We built a volcano", "adventure", "u-1", "Maya");
        let request = payload.clone().into_request();
        assert_eq!(*request.kind(), OfflineRequestKind::GenerateStory);
        assert_eq!(*request.attempts(), 0);
        assert_eq!(GenerateStoryPayload::from_request(&request).unwrap(), payload);
    }

    #[test]
    fn missing_key_is_a_decode_error() {
        let mut request = GenerateStoryPayload::new("e", "t", "g", "u", "s").into_request();
        request.payload.remove(KEY_GENRE);
        let err = GenerateStoryPayload::from_request(&request).unwrap_err();
        assert_eq!(err.category(), "decode");
    }

    #[test]
    fn attempt_counter_is_monotonic() {
        let request = GenerateStoryPayload::new("e", "t", "g", "u", "s").into_request();
        let bumped = request.with_attempt_recorded().with_attempt_recorded();
        assert_eq!(*bumped.attempts(), 2);
        assert_eq!(bumped.id(), request.id());
    }
}
