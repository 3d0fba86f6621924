//! Shared pieces used by every business module.

use serde::Deserialize;
use sitedesk_core::error::ApiResult;
use sitedesk_core::store::StoreAdapter;
use sitedesk_core::types::User;

/// Resolve the caller's tenant: the business they are a member of, or their
/// own uid when they belong to no one's team (they are their own tenant).
pub async fn resolve_tenant<S: StoreAdapter>(store: &S, user: &User) -> ApiResult<String> {
    match store.get_membership_for_user(&user.id).await? {
        Some(member) => Ok(member.business_id),
        None => Ok(user.id.clone()),
    }
}

/// Is the caller the owner of the given tenant?
pub fn is_owner(user: &User, business_id: &str) -> bool {
    user.id == business_id
}

/// List-window query string: `?limit=&offset=&sortBy=&sortDir=`.
///
/// Sorting and paging are applied in-handler over the fetched set; the store
/// itself is queried unwindowed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortDir")]
    pub sort_dir: Option<String>,
}

impl ListQuery {
    pub fn descending(&self) -> bool {
        matches!(self.sort_dir.as_deref(), Some("desc"))
    }
}

/// Sort by the query's field (via a per-module key lookup), then window.
pub fn apply_window<T, K, F>(mut items: Vec<T>, query: &ListQuery, key_for: F) -> Vec<T>
where
    K: Ord,
    F: Fn(&T, &str) -> Option<K>,
{
    if let Some(field) = query.sort_by.as_deref() {
        items.sort_by(|a, b| match (key_for(a, field), key_for(b, field)) {
            (Some(ka), Some(kb)) => ka.cmp(&kb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        if query.descending() {
            items.reverse();
        }
    }
    let offset = query.offset.unwrap_or(0);
    let mut items: Vec<T> = items.into_iter().skip(offset).collect();
    if let Some(limit) = query.limit {
        items.truncate(limit);
    }
    items
}
