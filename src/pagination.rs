use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Position in the conversation listing: the last-seen row's
/// `(last_message_at, id)` sort key. The id tie-break keeps the page
/// boundary stable when two conversations share a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationCursor {
    pub last_message_at: DateTime<Utc>,
    pub id: Uuid,
}

/// Position in a message listing: `(created_at, seq)`. `seq` is the
/// monotonic insert sequence, so ordering stays total even when two
/// messages land in the same microsecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageCursor {
    pub created_at: DateTime<Utc>,
    pub seq: i64,
}

impl ConversationCursor {
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(format!(
            "{}:{}",
            self.last_message_at.timestamp_micros(),
            self.id
        ))
    }

    pub fn decode(token: &str) -> Result<Self> {
        let (micros, id) = split_token(token)?;
        Ok(Self {
            last_message_at: micros_to_datetime(micros)?,
            id: id.parse().map_err(|_| invalid_cursor())?,
        })
    }
}

impl MessageCursor {
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(format!("{}:{}", self.created_at.timestamp_micros(), self.seq))
    }

    pub fn decode(token: &str) -> Result<Self> {
        let (micros, seq) = split_token(token)?;
        Ok(Self {
            created_at: micros_to_datetime(micros)?,
            seq: seq.parse().map_err(|_| invalid_cursor())?,
        })
    }
}

fn split_token(token: &str) -> Result<(i64, String)> {
    let raw = URL_SAFE_NO_PAD.decode(token).map_err(|_| invalid_cursor())?;
    let raw = String::from_utf8(raw).map_err(|_| invalid_cursor())?;
    let (micros, rest) = raw.split_once(':').ok_or_else(invalid_cursor)?;
    let micros = micros.parse().map_err(|_| invalid_cursor())?;
    Ok((micros, rest.to_string()))
}

fn micros_to_datetime(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros).ok_or_else(invalid_cursor)
}

fn invalid_cursor() -> AppError {
    AppError::BadRequest("Invalid pagination cursor".to_string())
}
