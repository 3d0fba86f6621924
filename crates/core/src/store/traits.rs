use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ApiResult;
use crate::types::{
    Asset, BusinessProfile, CreateAsset, CreateDocument, CreateInvitation, CreateMember,
    CreateSession, CreateUser, CreateVendor, DocumentRecord, Invitation, Member, Role, Session,
    UpdateAsset, UpdateDocument, UpdateVendor, UpsertBusinessProfile, User, Vendor,
};

/// User persistence operations.
#[async_trait]
pub trait UserOps: Send + Sync + 'static {
    async fn create_user(&self, user: CreateUser) -> ApiResult<User>;
    async fn get_user_by_id(&self, id: &str) -> ApiResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> ApiResult<Option<User>>;
    /// Grant or replace the user's team-role claim.
    async fn set_user_role(&self, id: &str, role: Role) -> ApiResult<User>;
}

/// Session persistence operations.
#[async_trait]
pub trait SessionOps: Send + Sync + 'static {
    async fn create_session(&self, session: CreateSession, token: String) -> ApiResult<Session>;
    async fn get_session(&self, token: &str) -> ApiResult<Option<Session>>;
    async fn update_session_expiry(&self, token: &str, expires_at: DateTime<Utc>)
        -> ApiResult<()>;
    async fn delete_session(&self, token: &str) -> ApiResult<()>;
    async fn delete_expired_sessions(&self) -> ApiResult<usize>;
}

/// Invitation persistence operations.
#[async_trait]
pub trait InvitationOps: Send + Sync + 'static {
    async fn create_invitation(&self, invitation: CreateInvitation) -> ApiResult<Invitation>;
    async fn get_invitation_by_token(&self, token: &str) -> ApiResult<Option<Invitation>>;
    /// Find a live pending invitation for the `(invited_email, sender_email)`
    /// pair. Pending invitations already past expiry are not reported.
    async fn get_pending_invitation(
        &self,
        invited_email: &str,
        sender_email: &str,
    ) -> ApiResult<Option<Invitation>>;
    /// Transition `pending -> accepted`, stamping `accepted_at`/`accepted_by`.
    ///
    /// Re-marking an invitation already accepted by the same user is a
    /// no-op success; any other non-pending state is a conflict.
    async fn mark_invitation_accepted(
        &self,
        id: &str,
        accepted_by: &str,
    ) -> ApiResult<Invitation>;
    /// Transition `pending -> rejected`.
    async fn mark_invitation_rejected(&self, id: &str) -> ApiResult<Invitation>;
    async fn list_invitations_by_sender(&self, sender_id: &str) -> ApiResult<Vec<Invitation>>;
}

/// Team membership persistence operations.
#[async_trait]
pub trait MemberOps: Send + Sync + 'static {
    async fn create_member(&self, member: CreateMember) -> ApiResult<Member>;
    async fn get_member(&self, business_id: &str, user_id: &str) -> ApiResult<Option<Member>>;
    async fn get_member_by_id(&self, id: &str) -> ApiResult<Option<Member>>;
    /// Find the membership (if any) that places a user in someone's team.
    async fn get_membership_for_user(&self, user_id: &str) -> ApiResult<Option<Member>>;
    async fn update_member_role(&self, member_id: &str, role: Role) -> ApiResult<Member>;
    async fn delete_member(&self, member_id: &str) -> ApiResult<()>;
    async fn list_members(&self, business_id: &str) -> ApiResult<Vec<Member>>;
}

/// Asset register persistence operations.
#[async_trait]
pub trait AssetOps: Send + Sync + 'static {
    async fn create_asset(&self, asset: CreateAsset) -> ApiResult<Asset>;
    async fn get_asset(&self, owner_id: &str, id: &str) -> ApiResult<Option<Asset>>;
    async fn update_asset(&self, owner_id: &str, id: &str, update: UpdateAsset)
        -> ApiResult<Asset>;
    async fn delete_asset(&self, owner_id: &str, id: &str) -> ApiResult<()>;
    async fn list_assets(&self, owner_id: &str) -> ApiResult<Vec<Asset>>;
}

/// Vendor directory persistence operations.
#[async_trait]
pub trait VendorOps: Send + Sync + 'static {
    async fn create_vendor(&self, vendor: CreateVendor) -> ApiResult<Vendor>;
    async fn get_vendor(&self, owner_id: &str, id: &str) -> ApiResult<Option<Vendor>>;
    async fn update_vendor(
        &self,
        owner_id: &str,
        id: &str,
        update: UpdateVendor,
    ) -> ApiResult<Vendor>;
    async fn delete_vendor(&self, owner_id: &str, id: &str) -> ApiResult<()>;
    async fn list_vendors(&self, owner_id: &str) -> ApiResult<Vec<Vendor>>;
}

/// Document metadata persistence operations.
#[async_trait]
pub trait DocumentOps: Send + Sync + 'static {
    async fn create_document(&self, document: CreateDocument) -> ApiResult<DocumentRecord>;
    async fn get_document(&self, owner_id: &str, id: &str) -> ApiResult<Option<DocumentRecord>>;
    async fn update_document(
        &self,
        owner_id: &str,
        id: &str,
        update: UpdateDocument,
    ) -> ApiResult<DocumentRecord>;
    async fn delete_document(&self, owner_id: &str, id: &str) -> ApiResult<()>;
    async fn list_documents(&self, owner_id: &str) -> ApiResult<Vec<DocumentRecord>>;
}

/// Business profile persistence operations.
#[async_trait]
pub trait ProfileOps: Send + Sync + 'static {
    async fn upsert_profile(&self, profile: UpsertBusinessProfile) -> ApiResult<BusinessProfile>;
    async fn get_profile(&self, owner_id: &str) -> ApiResult<Option<BusinessProfile>>;
}

/// Seam over the hosted document store.
///
/// Combines the entity-specific operation traits; any type implementing all
/// of them gets `StoreAdapter` through the blanket impl. Every read and
/// write is scoped by an owner id, mirroring the per-document security rules
/// of the hosted store, and the store's per-document atomic update is the
/// only concurrency primitive relied upon.
pub trait StoreAdapter:
    UserOps + SessionOps + InvitationOps + MemberOps + AssetOps + VendorOps + DocumentOps + ProfileOps
{
}

impl<T> StoreAdapter for T where
    T: UserOps
        + SessionOps
        + InvitationOps
        + MemberOps
        + AssetOps
        + VendorOps
        + DocumentOps
        + ProfileOps
{
}
