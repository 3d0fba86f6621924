use std::collections::HashMap;
use std::sync::Mutex;

use sitedesk_core::types::Invitation;

/// Non-authoritative read-through cache of invitations issued by this
/// process, keyed by token.
///
/// The central store is always the source of truth: `reconcile` returns the
/// authoritative list untouched and drops any cached entry the store no
/// longer knows about, so a cosmetic local entry can never surface in a
/// reconciled view.
#[derive(Default)]
pub struct PendingInvitationCache {
    entries: Mutex<HashMap<String, Invitation>>,
}

impl PendingInvitationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly issued invitation.
    pub fn record(&self, invitation: Invitation) {
        self.entries
            .lock()
            .unwrap()
            .insert(invitation.token.clone(), invitation);
    }

    /// Fast lookup by token. Callers must treat a hit as a hint only.
    pub fn get(&self, token: &str) -> Option<Invitation> {
        self.entries.lock().unwrap().get(token).cloned()
    }

    /// Prune entries absent from the authoritative list, then return that
    /// list as-is.
    pub fn reconcile(&self, authoritative: Vec<Invitation>) -> Vec<Invitation> {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|token, _| authoritative.iter().any(|inv| &inv.token == token));
        authoritative
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}
