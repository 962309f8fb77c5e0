use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of the external ID workflow as seen by the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Empty,
    Loading,
    Success,
    NotFound,
    InvalidFormat,
    TimedOut,
    Failed,
}

impl VerificationStatus {
    /// Translation key for the status line under the external ID input.
    pub fn message_key(&self) -> &'static str {
        match self {
            VerificationStatus::Success => "External ID verified successfully",
            VerificationStatus::NotFound => "External ID not found",
            VerificationStatus::InvalidFormat => "External ID format is invalid",
            VerificationStatus::TimedOut => "External ID lookup timed out",
            VerificationStatus::Failed => "External ID lookup failed",
            VerificationStatus::Loading => "Looking up External ID...",
            VerificationStatus::Empty => "",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, VerificationStatus::Loading)
    }

    /// Terminal states stay put until the next input arrives.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, VerificationStatus::Empty | VerificationStatus::Loading)
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            VerificationStatus::Empty => "EMPTY",
            VerificationStatus::Loading => "LOADING",
            VerificationStatus::Success => "SUCCESS",
            VerificationStatus::NotFound => "NOT FOUND",
            VerificationStatus::InvalidFormat => "INVALID FORMAT",
            VerificationStatus::TimedOut => "TIMED OUT",
            VerificationStatus::Failed => "FAILED",
        };
        write!(f, "{}", label)
    }
}

/// Body returned by the external national ID API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middlename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_message: Option<String>,
}

/// A selectable gender from the client template of the banking API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderOption {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub mandatory: Option<bool>,
}

impl GenderOption {
    pub fn new(id: i64, name: &str) -> Self {
        GenderOption {
            id,
            name: name.to_string(),
            active: None,
            mandatory: None,
        }
    }
}

/// Caller-supplied context sent along with each lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupContext {
    pub locale: Option<String>,
    pub currency: Option<String>,
}

/// Person fields auto-filled and locked by a successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PersonField {
    Firstname,
    Middlename,
    Lastname,
    DateOfBirth,
    GenderId,
}

impl PersonField {
    pub const ALL: [PersonField; 5] = [
        PersonField::Firstname,
        PersonField::Middlename,
        PersonField::Lastname,
        PersonField::DateOfBirth,
        PersonField::GenderId,
    ];

    /// Control name used by the client form.
    pub fn name(&self) -> &'static str {
        match self {
            PersonField::Firstname => "firstname",
            PersonField::Middlename => "middlename",
            PersonField::Lastname => "lastname",
            PersonField::DateOfBirth => "dateOfBirth",
            PersonField::GenderId => "genderId",
        }
    }
}

impl fmt::Display for PersonField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
