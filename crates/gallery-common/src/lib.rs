// Shared identifier types used by the gallery service and its store.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid id: {0}")]
    InvalidId(String),
}

pub mod ids {
    // Opaque identifiers; every new id in the service comes from `new()`.
    use super::{Error, Result};
    use serde::{Deserialize, Deserializer, Serialize};
    use std::fmt;
    use std::str::FromStr;
    use utoipa::ToSchema;
    use uuid::Uuid;

    // Older data files carry numeric timestamp ids (some fractional). They are
    // accepted on read and normalized to their string form.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(u64),
        Float(f64),
    }

    impl RawId {
        fn into_string(self) -> String {
            match self {
                RawId::Text(value) => value,
                RawId::Integer(value) => value.to_string(),
                RawId::Float(value) => value.to_string(),
            }
        }
    }

    macro_rules! id_type {
        ($name:ident) => {
            #[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, ToSchema)]
            pub struct $name(String);

            impl $name {
                // Generate a new random ID.
                pub fn new() -> Self {
                    Self(Uuid::new_v4().to_string())
                }

                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl Default for $name {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl FromStr for $name {
                type Err = Error;

                fn from_str(input: &str) -> Result<Self> {
                    let trimmed = input.trim();
                    if trimmed.is_empty() || trimmed.contains('/') {
                        return Err(Error::InvalidId(input.into()));
                    }
                    Ok(Self(trimmed.to_string()))
                }
            }

            impl<'de> Deserialize<'de> for $name {
                fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
                }
            }
        };
    }

    id_type!(AlbumId);
    id_type!(PhotoId);
}

pub use ids::{AlbumId, PhotoId};
