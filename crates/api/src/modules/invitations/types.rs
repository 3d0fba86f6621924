use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitedesk_core::types::{Invitation, InvitationStatus, Role};
use validator::Validate;

/// `POST /invitations` request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvitationRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub role: Role,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub message: Option<String>,
}

/// `POST /invitations` response.
#[derive(Debug, Serialize)]
pub struct CreateInvitationResponse {
    #[serde(rename = "invitationId")]
    pub invitation_id: String,
    #[serde(rename = "invitationLink")]
    pub invitation_link: String,
    #[serde(rename = "emailSent")]
    pub email_sent: bool,
    #[serde(rename = "emailWarning", skip_serializing_if = "Option::is_none")]
    pub email_warning: Option<String>,
}

/// `GET /invitations/verify/{token}` response.
#[derive(Debug, Serialize)]
pub struct VerifyInvitationResponse {
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "companyName")]
    pub company_name: String,
    #[serde(rename = "invitedBy")]
    pub invited_by: String,
    pub status: InvitationStatus,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

impl VerifyInvitationResponse {
    pub fn from_invitation(invitation: Invitation, company_name: String) -> Self {
        Self {
            email: invitation.invited_email,
            role: invitation.invited_role,
            message: invitation.invited_message,
            company_name,
            invited_by: invitation.sender_email,
            status: invitation.status,
            expires_at: invitation.expires_at,
        }
    }
}

/// `POST /invitations/accept/{token}` response.
#[derive(Debug, Serialize)]
pub struct AcceptInvitationResponse {
    #[serde(rename = "businessId")]
    pub business_id: String,
    pub role: Role,
    #[serde(rename = "memberId")]
    pub member_id: String,
}

/// `POST /invitations/reject/{token}` response.
#[derive(Debug, Serialize)]
pub struct RejectInvitationResponse {
    pub status: InvitationStatus,
}

/// `GET /invitations` response.
#[derive(Debug, Serialize)]
pub struct ListInvitationsResponse {
    pub invitations: Vec<Invitation>,
}
