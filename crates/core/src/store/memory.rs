use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::types::{
    Asset, BusinessProfile, CreateAsset, CreateDocument, CreateInvitation, CreateMember,
    CreateSession, CreateUser, CreateVendor, DocumentRecord, Invitation, InvitationStatus, Member,
    Role, Session, UpdateAsset, UpdateDocument, UpdateVendor, UpsertBusinessProfile, User, Vendor,
};

use super::traits::{
    AssetOps, DocumentOps, InvitationOps, MemberOps, ProfileOps, SessionOps, UserOps, VendorOps,
};

/// In-memory store for development and testing.
///
/// Each collection is its own mutex so unrelated operations never contend.
/// Secondary indexes (email, token) keep the hot lookups O(1), the way the
/// hosted store's single-field indexes do.
#[derive(Clone)]
pub struct MemoryStore {
    users: Arc<Mutex<HashMap<String, User>>>,
    /// lowercased email -> user id
    email_index: Arc<Mutex<HashMap<String, String>>>,
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    invitations: Arc<Mutex<HashMap<String, Invitation>>>,
    /// token -> invitation id
    token_index: Arc<Mutex<HashMap<String, String>>>,
    members: Arc<Mutex<HashMap<String, Member>>>,
    assets: Arc<Mutex<HashMap<String, Asset>>>,
    vendors: Arc<Mutex<HashMap<String, Vendor>>>,
    documents: Arc<Mutex<HashMap<String, DocumentRecord>>>,
    /// keyed by owner id, at most one per tenant
    profiles: Arc<Mutex<HashMap<String, BusinessProfile>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            email_index: Arc::new(Mutex::new(HashMap::new())),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            invitations: Arc::new(Mutex::new(HashMap::new())),
            token_index: Arc::new(Mutex::new(HashMap::new())),
            members: Arc::new(Mutex::new(HashMap::new())),
            assets: Arc::new(Mutex::new(HashMap::new())),
            vendors: Arc::new(Mutex::new(HashMap::new())),
            documents: Arc::new(Mutex::new(HashMap::new())),
            profiles: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl UserOps for MemoryStore {
    async fn create_user(&self, user: CreateUser) -> ApiResult<User> {
        let email = user.email.to_lowercase();
        let mut index = self.email_index.lock().unwrap();
        if index.contains_key(&email) {
            return Err(ApiError::duplicate("A user with this email already exists"));
        }
        let now = Utc::now();
        let record = User {
            id: user.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            email,
            name: user.name,
            role: None,
            created_at: now,
            updated_at: now,
        };
        index.insert(record.email.clone(), record.id.clone());
        self.users
            .lock()
            .unwrap()
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get_user_by_id(&self, id: &str) -> ApiResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let id = self
            .email_index
            .lock()
            .unwrap()
            .get(&email.to_lowercase())
            .cloned();
        match id {
            Some(id) => Ok(self.users.lock().unwrap().get(&id).cloned()),
            None => Ok(None),
        }
    }

    async fn set_user_role(&self, id: &str, role: Role) -> ApiResult<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(id)
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        user.role = Some(role);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl SessionOps for MemoryStore {
    async fn create_session(&self, session: CreateSession, token: String) -> ApiResult<Session> {
        let record = Session {
            id: Uuid::new_v4().to_string(),
            token: token.clone(),
            user_id: session.user_id,
            expires_at: session.expires_at,
            created_at: Utc::now(),
        };
        self.sessions.lock().unwrap().insert(token, record.clone());
        Ok(record)
    }

    async fn get_session(&self, token: &str) -> ApiResult<Option<Session>> {
        Ok(self.sessions.lock().unwrap().get(token).cloned())
    }

    async fn update_session_expiry(
        &self,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> ApiResult<()> {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(session) = sessions.get_mut(token) {
            session.expires_at = expires_at;
        }
        Ok(())
    }

    async fn delete_session(&self, token: &str) -> ApiResult<()> {
        self.sessions.lock().unwrap().remove(token);
        Ok(())
    }

    async fn delete_expired_sessions(&self) -> ApiResult<usize> {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        Ok(before - sessions.len())
    }
}

#[async_trait]
impl InvitationOps for MemoryStore {
    async fn create_invitation(&self, invitation: CreateInvitation) -> ApiResult<Invitation> {
        let record = Invitation {
            id: Uuid::new_v4().to_string(),
            token: invitation.token.clone(),
            business_id: invitation.business_id,
            invited_email: invitation.invited_email.to_lowercase(),
            invited_role: invitation.invited_role,
            invited_message: invitation.invited_message,
            sender_email: invitation.sender_email.to_lowercase(),
            invited_by: invitation.invited_by,
            status: InvitationStatus::Pending,
            created_at: Utc::now(),
            expires_at: invitation.expires_at,
            accepted_at: None,
            accepted_by: None,
        };
        self.token_index
            .lock()
            .unwrap()
            .insert(invitation.token, record.id.clone());
        self.invitations
            .lock()
            .unwrap()
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get_invitation_by_token(&self, token: &str) -> ApiResult<Option<Invitation>> {
        let id = self.token_index.lock().unwrap().get(token).cloned();
        match id {
            Some(id) => Ok(self.invitations.lock().unwrap().get(&id).cloned()),
            None => Ok(None),
        }
    }

    async fn get_pending_invitation(
        &self,
        invited_email: &str,
        sender_email: &str,
    ) -> ApiResult<Option<Invitation>> {
        let invited = invited_email.to_lowercase();
        let sender = sender_email.to_lowercase();
        let invitations = self.invitations.lock().unwrap();
        Ok(invitations
            .values()
            .find(|inv| {
                inv.is_pending()
                    && !inv.is_expired()
                    && inv.invited_email == invited
                    && inv.sender_email == sender
            })
            .cloned())
    }

    async fn mark_invitation_accepted(
        &self,
        id: &str,
        accepted_by: &str,
    ) -> ApiResult<Invitation> {
        let mut invitations = self.invitations.lock().unwrap();
        let invitation = invitations
            .get_mut(id)
            .ok_or_else(|| ApiError::not_found("Invitation not found"))?;
        match invitation.status {
            InvitationStatus::Pending => {
                invitation.status = InvitationStatus::Accepted;
                invitation.accepted_at = Some(Utc::now());
                invitation.accepted_by = Some(accepted_by.to_string());
                Ok(invitation.clone())
            }
            // Re-running the accept effects is allowed for the same user.
            InvitationStatus::Accepted
                if invitation.accepted_by.as_deref() == Some(accepted_by) =>
            {
                Ok(invitation.clone())
            }
            _ => Err(ApiError::conflict("Invitation is no longer pending")),
        }
    }

    async fn mark_invitation_rejected(&self, id: &str) -> ApiResult<Invitation> {
        let mut invitations = self.invitations.lock().unwrap();
        let invitation = invitations
            .get_mut(id)
            .ok_or_else(|| ApiError::not_found("Invitation not found"))?;
        if !invitation.is_pending() {
            return Err(ApiError::conflict("Invitation is no longer pending"));
        }
        invitation.status = InvitationStatus::Rejected;
        Ok(invitation.clone())
    }

    async fn list_invitations_by_sender(&self, sender_id: &str) -> ApiResult<Vec<Invitation>> {
        let invitations = self.invitations.lock().unwrap();
        let mut result: Vec<Invitation> = invitations
            .values()
            .filter(|inv| inv.invited_by == sender_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }
}

#[async_trait]
impl MemberOps for MemoryStore {
    async fn create_member(&self, member: CreateMember) -> ApiResult<Member> {
        let mut members = self.members.lock().unwrap();
        let exists = members
            .values()
            .any(|m| m.business_id == member.business_id && m.user_id == member.user_id);
        if exists {
            return Err(ApiError::duplicate("User is already a member of this team"));
        }
        let record = Member {
            id: Uuid::new_v4().to_string(),
            business_id: member.business_id,
            user_id: member.user_id,
            email: member.email.to_lowercase(),
            role: member.role,
            created_at: Utc::now(),
        };
        members.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get_member(&self, business_id: &str, user_id: &str) -> ApiResult<Option<Member>> {
        let members = self.members.lock().unwrap();
        Ok(members
            .values()
            .find(|m| m.business_id == business_id && m.user_id == user_id)
            .cloned())
    }

    async fn get_member_by_id(&self, id: &str) -> ApiResult<Option<Member>> {
        Ok(self.members.lock().unwrap().get(id).cloned())
    }

    async fn get_membership_for_user(&self, user_id: &str) -> ApiResult<Option<Member>> {
        let members = self.members.lock().unwrap();
        Ok(members.values().find(|m| m.user_id == user_id).cloned())
    }

    async fn update_member_role(&self, member_id: &str, role: Role) -> ApiResult<Member> {
        let mut members = self.members.lock().unwrap();
        let member = members
            .get_mut(member_id)
            .ok_or_else(|| ApiError::not_found("Member not found"))?;
        member.role = role;
        Ok(member.clone())
    }

    async fn delete_member(&self, member_id: &str) -> ApiResult<()> {
        self.members
            .lock()
            .unwrap()
            .remove(member_id)
            .map(|_| ())
            .ok_or_else(|| ApiError::not_found("Member not found"))
    }

    async fn list_members(&self, business_id: &str) -> ApiResult<Vec<Member>> {
        let members = self.members.lock().unwrap();
        let mut result: Vec<Member> = members
            .values()
            .filter(|m| m.business_id == business_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(result)
    }
}

#[async_trait]
impl AssetOps for MemoryStore {
    async fn create_asset(&self, asset: CreateAsset) -> ApiResult<Asset> {
        let now = Utc::now();
        let record = Asset {
            id: Uuid::new_v4().to_string(),
            owner_id: asset.owner_id,
            name: asset.name,
            category: asset.category,
            status: asset.status,
            serial_number: asset.serial_number,
            purchase_date: asset.purchase_date,
            value: asset.value,
            location: asset.location,
            notes: asset.notes,
            created_at: now,
            updated_at: now,
        };
        self.assets
            .lock()
            .unwrap()
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get_asset(&self, owner_id: &str, id: &str) -> ApiResult<Option<Asset>> {
        let assets = self.assets.lock().unwrap();
        Ok(assets
            .get(id)
            .filter(|a| a.owner_id == owner_id)
            .cloned())
    }

    async fn update_asset(
        &self,
        owner_id: &str,
        id: &str,
        update: UpdateAsset,
    ) -> ApiResult<Asset> {
        let mut assets = self.assets.lock().unwrap();
        let asset = assets
            .get_mut(id)
            .filter(|a| a.owner_id == owner_id)
            .ok_or_else(|| ApiError::not_found("Asset not found"))?;
        if let Some(name) = update.name {
            asset.name = name;
        }
        if let Some(category) = update.category {
            asset.category = category;
        }
        if let Some(status) = update.status {
            asset.status = status;
        }
        if update.serial_number.is_some() {
            asset.serial_number = update.serial_number;
        }
        if update.purchase_date.is_some() {
            asset.purchase_date = update.purchase_date;
        }
        if update.value.is_some() {
            asset.value = update.value;
        }
        if update.location.is_some() {
            asset.location = update.location;
        }
        if update.notes.is_some() {
            asset.notes = update.notes;
        }
        asset.updated_at = Utc::now();
        Ok(asset.clone())
    }

    async fn delete_asset(&self, owner_id: &str, id: &str) -> ApiResult<()> {
        let mut assets = self.assets.lock().unwrap();
        let matches = assets.get(id).is_some_and(|a| a.owner_id == owner_id);
        if !matches {
            return Err(ApiError::not_found("Asset not found"));
        }
        assets.remove(id);
        Ok(())
    }

    async fn list_assets(&self, owner_id: &str) -> ApiResult<Vec<Asset>> {
        let assets = self.assets.lock().unwrap();
        let mut result: Vec<Asset> = assets
            .values()
            .filter(|a| a.owner_id == owner_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }
}

#[async_trait]
impl VendorOps for MemoryStore {
    async fn create_vendor(&self, vendor: CreateVendor) -> ApiResult<Vendor> {
        let now = Utc::now();
        let record = Vendor {
            id: Uuid::new_v4().to_string(),
            owner_id: vendor.owner_id,
            name: vendor.name,
            trade: vendor.trade,
            contact_name: vendor.contact_name,
            email: vendor.email,
            phone: vendor.phone,
            address: vendor.address,
            notes: vendor.notes,
            created_at: now,
            updated_at: now,
        };
        self.vendors
            .lock()
            .unwrap()
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get_vendor(&self, owner_id: &str, id: &str) -> ApiResult<Option<Vendor>> {
        let vendors = self.vendors.lock().unwrap();
        Ok(vendors
            .get(id)
            .filter(|v| v.owner_id == owner_id)
            .cloned())
    }

    async fn update_vendor(
        &self,
        owner_id: &str,
        id: &str,
        update: UpdateVendor,
    ) -> ApiResult<Vendor> {
        let mut vendors = self.vendors.lock().unwrap();
        let vendor = vendors
            .get_mut(id)
            .filter(|v| v.owner_id == owner_id)
            .ok_or_else(|| ApiError::not_found("Vendor not found"))?;
        if let Some(name) = update.name {
            vendor.name = name;
        }
        if let Some(trade) = update.trade {
            vendor.trade = trade;
        }
        if update.contact_name.is_some() {
            vendor.contact_name = update.contact_name;
        }
        if update.email.is_some() {
            vendor.email = update.email;
        }
        if update.phone.is_some() {
            vendor.phone = update.phone;
        }
        if update.address.is_some() {
            vendor.address = update.address;
        }
        if update.notes.is_some() {
            vendor.notes = update.notes;
        }
        vendor.updated_at = Utc::now();
        Ok(vendor.clone())
    }

    async fn delete_vendor(&self, owner_id: &str, id: &str) -> ApiResult<()> {
        let mut vendors = self.vendors.lock().unwrap();
        let matches = vendors.get(id).is_some_and(|v| v.owner_id == owner_id);
        if !matches {
            return Err(ApiError::not_found("Vendor not found"));
        }
        vendors.remove(id);
        Ok(())
    }

    async fn list_vendors(&self, owner_id: &str) -> ApiResult<Vec<Vendor>> {
        let vendors = self.vendors.lock().unwrap();
        let mut result: Vec<Vendor> = vendors
            .values()
            .filter(|v| v.owner_id == owner_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }
}

#[async_trait]
impl DocumentOps for MemoryStore {
    async fn create_document(&self, document: CreateDocument) -> ApiResult<DocumentRecord> {
        let now = Utc::now();
        let record = DocumentRecord {
            id: Uuid::new_v4().to_string(),
            owner_id: document.owner_id,
            title: document.title,
            category: document.category,
            url: document.url,
            content_type: document.content_type,
            size_bytes: document.size_bytes,
            created_at: now,
            updated_at: now,
        };
        self.documents
            .lock()
            .unwrap()
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get_document(&self, owner_id: &str, id: &str) -> ApiResult<Option<DocumentRecord>> {
        let documents = self.documents.lock().unwrap();
        Ok(documents
            .get(id)
            .filter(|d| d.owner_id == owner_id)
            .cloned())
    }

    async fn update_document(
        &self,
        owner_id: &str,
        id: &str,
        update: UpdateDocument,
    ) -> ApiResult<DocumentRecord> {
        let mut documents = self.documents.lock().unwrap();
        let document = documents
            .get_mut(id)
            .filter(|d| d.owner_id == owner_id)
            .ok_or_else(|| ApiError::not_found("Document not found"))?;
        if let Some(title) = update.title {
            document.title = title;
        }
        if let Some(category) = update.category {
            document.category = category;
        }
        if let Some(url) = update.url {
            document.url = url;
        }
        if update.content_type.is_some() {
            document.content_type = update.content_type;
        }
        if update.size_bytes.is_some() {
            document.size_bytes = update.size_bytes;
        }
        document.updated_at = Utc::now();
        Ok(document.clone())
    }

    async fn delete_document(&self, owner_id: &str, id: &str) -> ApiResult<()> {
        let mut documents = self.documents.lock().unwrap();
        let matches = documents.get(id).is_some_and(|d| d.owner_id == owner_id);
        if !matches {
            return Err(ApiError::not_found("Document not found"));
        }
        documents.remove(id);
        Ok(())
    }

    async fn list_documents(&self, owner_id: &str) -> ApiResult<Vec<DocumentRecord>> {
        let documents = self.documents.lock().unwrap();
        let mut result: Vec<DocumentRecord> = documents
            .values()
            .filter(|d| d.owner_id == owner_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }
}

#[async_trait]
impl ProfileOps for MemoryStore {
    async fn upsert_profile(&self, profile: UpsertBusinessProfile) -> ApiResult<BusinessProfile> {
        let record = BusinessProfile {
            owner_id: profile.owner_id.clone(),
            company_name: profile.company_name,
            registration_number: profile.registration_number,
            email: profile.email,
            phone: profile.phone,
            address: profile.address,
            about: profile.about,
            updated_at: Utc::now(),
        };
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.owner_id, record.clone());
        Ok(record)
    }

    async fn get_profile(&self, owner_id: &str) -> ApiResult<Option<BusinessProfile>> {
        Ok(self.profiles.lock().unwrap().get(owner_id).cloned())
    }
}
