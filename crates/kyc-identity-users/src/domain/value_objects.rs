//! Value types of the User context.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// KYC state of a user. No state is terminal: a rejected user may later be
/// verified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    /// No decision yet.
    #[default]
    Pending,
    /// Identity verified.
    Verified,
    /// Identity documents rejected.
    Rejected,
}

impl KycStatus {
    /// Storage / wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for KycStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown KYC status string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown KYC status: {0}")]
pub struct UnknownKycStatus(pub String);

impl FromStr for KycStatus {
    type Err = UnknownKycStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "verified" => Ok(Self::Verified),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownKycStatus(other.to_owned())),
        }
    }
}

/// Identity documents submitted for KYC verification.
///
/// Known document shapes are typed; anything else travels as an opaque JSON
/// payload. Deserialization is strict only for the known `type` tags: a
/// bundle without a `type`, or with an unrecognised one, becomes `Other`
/// holding the whole value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KycDocuments {
    /// Government-issued national identity card.
    NationalId {
        /// Card number.
        document_number: String,
        /// Issuing country (ISO 3166-1 alpha-2).
        country: String,
    },
    /// Passport.
    Passport {
        /// Passport number.
        passport_number: String,
        /// Issuing country (ISO 3166-1 alpha-2).
        country: String,
    },
    /// Any other document bundle, kept verbatim.
    Other {
        /// Raw document data.
        payload: serde_json::Value,
    },
}

const KNOWN_DOCUMENT_TAGS: [&str; 3] = ["national_id", "passport", "other"];

/// Wire form of the known document tags.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TaggedDocuments {
    NationalId {
        document_number: String,
        country: String,
    },
    Passport {
        passport_number: String,
        country: String,
    },
    Other {
        payload: serde_json::Value,
    },
}

impl From<TaggedDocuments> for KycDocuments {
    fn from(tagged: TaggedDocuments) -> Self {
        match tagged {
            TaggedDocuments::NationalId {
                document_number,
                country,
            } => Self::NationalId {
                document_number,
                country,
            },
            TaggedDocuments::Passport {
                passport_number,
                country,
            } => Self::Passport {
                passport_number,
                country,
            },
            TaggedDocuments::Other { payload } => Self::Other { payload },
        }
    }
}

impl<'de> Deserialize<'de> for KycDocuments {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let known = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|tag| KNOWN_DOCUMENT_TAGS.contains(&tag));
        if !known {
            return Ok(Self::Other { payload: value });
        }
        TaggedDocuments::deserialize(value)
            .map(Self::from)
            .map_err(de::Error::custom)
    }
}

impl KycDocuments {
    /// The `type` tag of this document bundle.
    #[must_use]
    pub fn document_type(&self) -> &'static str {
        match self {
            Self::NationalId { .. } => "national_id",
            Self::Passport { .. } => "passport",
            Self::Other { .. } => "other",
        }
    }
}

/// Partial profile delta. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileChanges {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ProfileChanges {
    /// Returns `true` if no field is supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}
