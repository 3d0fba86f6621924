use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export business-record types
pub use super::types_business::{
    Asset, BusinessProfile, CreateAsset, CreateDocument, CreateVendor, DocumentRecord,
    UpdateAsset, UpdateDocument, UpdateVendor, UpsertBusinessProfile, Vendor,
};

/// A user account, mirrored from the hosted identity provider.
///
/// `role` is the granted team-role claim, set when the user accepts an
/// invitation and used for subsequent authorization checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: Option<Role>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// An authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub token: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// User creation data.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: Option<String>,
    pub email: String,
    pub name: Option<String>,
}

impl CreateUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: Some(Uuid::new_v4().to_string()),
            email: email.into(),
            name: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Session creation data.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Team role, closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    User,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "manager" => Some(Self::Manager),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invitation status.
///
/// Transitions only `pending → accepted` or `pending → rejected`; `accepted`
/// is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Accepted => write!(f, "accepted"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A team invitation.
///
/// `token` is the sole authoritative identifier on the wire; it is unique and
/// immutable once issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    pub id: String,
    pub token: String,
    #[serde(rename = "businessId")]
    pub business_id: String,
    #[serde(rename = "invitedEmail")]
    pub invited_email: String,
    #[serde(rename = "invitedRole")]
    pub invited_role: Role,
    #[serde(rename = "invitedMessage", skip_serializing_if = "Option::is_none")]
    pub invited_message: Option<String>,
    #[serde(rename = "senderEmail")]
    pub sender_email: String,
    #[serde(rename = "invitedBy")]
    pub invited_by: String,
    pub status: InvitationStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
    #[serde(rename = "acceptedAt", skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(rename = "acceptedBy", skip_serializing_if = "Option::is_none")]
    pub accepted_by: Option<String>,
}

impl Invitation {
    /// Check if the invitation is still pending.
    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }

    /// Check if the invitation has passed its expiry instant.
    ///
    /// Expiry is evaluated lazily at verify/accept time; there is no sweep.
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Invitation creation data.
#[derive(Debug, Clone)]
pub struct CreateInvitation {
    pub token: String,
    pub business_id: String,
    pub invited_email: String,
    pub invited_role: Role,
    pub invited_message: Option<String>,
    pub sender_email: String,
    pub invited_by: String,
    pub expires_at: DateTime<Utc>,
}

/// A team membership linking a user to a business tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    #[serde(rename = "businessId")]
    pub business_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    pub role: Role,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Member creation data.
#[derive(Debug, Clone)]
pub struct CreateMember {
    pub business_id: String,
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

impl CreateMember {
    pub fn new(
        business_id: impl Into<String>,
        user_id: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            business_id: business_id.into(),
            user_id: user_id.into(),
            email: email.into(),
            role,
        }
    }
}

/// Health-check response for `/health`.
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn invitation(status: InvitationStatus, expires_at: DateTime<Utc>) -> Invitation {
        Invitation {
            id: "inv-1".into(),
            token: "tok-1".into(),
            business_id: "biz-1".into(),
            invited_email: "bob@x.com".into(),
            invited_role: Role::Manager,
            invited_message: None,
            sender_email: "owner@x.com".into(),
            invited_by: "user-1".into(),
            status,
            created_at: Utc::now(),
            expires_at,
            accepted_at: None,
            accepted_by: None,
        }
    }

    #[test]
    fn test_role_parse_closed_set() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("Manager"), Some(Role::Manager));
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("owner"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_invitation_expiry_is_lazy_comparison() {
        let past = invitation(InvitationStatus::Pending, Utc::now() - Duration::hours(1));
        assert!(past.is_expired());
        assert!(past.is_pending());

        let future = invitation(InvitationStatus::Pending, Utc::now() + Duration::days(7));
        assert!(!future.is_expired());
    }

    #[test]
    fn test_invitation_serializes_camel_case() {
        let inv = invitation(InvitationStatus::Pending, Utc::now() + Duration::days(7));
        let value = serde_json::to_value(&inv).unwrap();
        assert_eq!(value["invitedEmail"], "bob@x.com");
        assert_eq!(value["invitedRole"], "manager");
        assert_eq!(value["status"], "pending");
        assert!(value.get("acceptedAt").is_none());
    }
}
