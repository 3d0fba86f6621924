use serde::{Deserialize, Serialize};
use sitedesk_core::types::{Member, Role};
use validator::Validate;

/// `POST /team/members/{id}/role` request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

/// `GET /team/members` response.
#[derive(Debug, Serialize)]
pub struct ListMembersResponse {
    pub members: Vec<Member>,
}
