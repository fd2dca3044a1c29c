//! Postmark API response types
//!
//! Field names mirror the Postmark JSON exactly via PascalCase renames, so
//! responses pass through to callers unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response to sending a single message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendResponse {
    /// Postmark error code; `0` means accepted
    #[serde(default)]
    pub error_code: i64,
    /// Human-readable status message
    #[serde(default)]
    pub message: String,
    /// Postmark message id, present on success
    #[serde(rename = "MessageID", default)]
    pub message_id: Option<String>,
    /// Submission timestamp
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    /// Recipient list as echoed by the API
    #[serde(default)]
    pub to: Option<String>,
}

/// Bounce counts for one bounce type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BounceTypeCount {
    /// Bounce type identifier, absent for the aggregate row
    #[serde(rename = "Type", default)]
    pub bounce_type: Option<String>,
    /// Display name of the bounce type
    #[serde(default)]
    pub name: String,
    /// Number of bounces of this type
    #[serde(default)]
    pub count: i64,
}

/// Delivery statistics for the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeliveryStats {
    /// Number of inactive email addresses
    #[serde(default)]
    pub inactive_mails: i64,
    /// Bounce counts broken down by type
    #[serde(default)]
    pub bounces: Vec<BounceTypeCount>,
}

/// One email delivery failure record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bounce {
    /// Bounce id
    #[serde(rename = "ID", default)]
    pub id: u64,
    /// Bounce type identifier
    #[serde(rename = "Type", default)]
    pub bounce_type: String,
    /// Numeric bounce type code
    #[serde(default)]
    pub type_code: i64,
    /// Display name of the bounce type
    #[serde(default)]
    pub name: String,
    /// Tag of the bounced message, if any
    #[serde(default)]
    pub tag: Option<String>,
    /// Postmark id of the bounced message
    #[serde(rename = "MessageID", default)]
    pub message_id: Option<String>,
    /// Short description of the failure
    #[serde(default)]
    pub description: Option<String>,
    /// Raw details reported by the receiving server
    #[serde(default)]
    pub details: Option<String>,
    /// Recipient address that bounced
    #[serde(default)]
    pub email: String,
    /// When the bounce occurred
    #[serde(default)]
    pub bounced_at: Option<DateTime<Utc>>,
    /// Whether a raw dump is available for this bounce
    #[serde(default)]
    pub dump_available: bool,
    /// Whether the address has been deactivated
    #[serde(default)]
    pub inactive: bool,
    /// Whether the address can be reactivated
    #[serde(default)]
    pub can_activate: bool,
    /// Subject of the bounced message
    #[serde(default)]
    pub subject: Option<String>,
}

/// A paginated list of bounces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BouncesResponse {
    /// Total bounce count on the server
    #[serde(default)]
    pub total_count: i64,
    /// The bounces in this page
    #[serde(default)]
    pub bounces: Vec<Bounce>,
}

/// Raw email dump for a bounce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BounceDump {
    /// Raw source of the bounced message, if retained
    #[serde(default)]
    pub body: Option<String>,
}

/// Result of reactivating a bounce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BounceActivation {
    /// Status message
    #[serde(default)]
    pub message: String,
    /// The bounce record after reactivation
    #[serde(default)]
    pub bounce: Bounce,
}

/// Postmark error body, decoded from non-success responses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub error_code: i64,
    #[serde(default)]
    pub message: String,
}
