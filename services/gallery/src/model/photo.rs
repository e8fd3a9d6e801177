//! Photo records stored inside albums.
use chrono::{DateTime, Utc};
use gallery_common::PhotoId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: PhotoId,
    /// Public path of the stored file, e.g. `/uploads/<name>.jpg`.
    pub src: String,
    pub caption: String,
    /// Absent on records written before upload timestamps were tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Photo {
    /// When the photo was added, in epoch milliseconds. Records without
    /// `createdAt` were keyed by their upload time, so a numeric id stands in.
    pub fn added_at_millis(&self) -> Option<f64> {
        match self.created_at {
            Some(at) => Some(at.timestamp_millis() as f64),
            None => self
                .id
                .as_str()
                .parse::<f64>()
                .ok()
                .filter(|millis| millis.is_finite()),
        }
    }
}
