use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An entry in the asset register (plant, tools, vehicles).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    #[serde(rename = "ownerId")]
    pub owner_id: String,
    pub name: String,
    pub category: String,
    pub status: String,
    #[serde(rename = "serialNumber", skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(rename = "purchaseDate", skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Asset creation data.
#[derive(Debug, Clone)]
pub struct CreateAsset {
    pub owner_id: String,
    pub name: String,
    pub category: String,
    pub status: String,
    pub serial_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub value: Option<f64>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Asset update data. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAsset {
    pub name: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub serial_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub value: Option<f64>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// A vendor / subcontractor directory entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    #[serde(rename = "ownerId")]
    pub owner_id: String,
    pub name: String,
    pub trade: String,
    #[serde(rename = "contactName", skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Vendor creation data.
#[derive(Debug, Clone)]
pub struct CreateVendor {
    pub owner_id: String,
    pub name: String,
    pub trade: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Vendor update data.
#[derive(Debug, Clone, Default)]
pub struct UpdateVendor {
    pub name: Option<String>,
    pub trade: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// A stored document's metadata. The blob itself lives in the hosted store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    #[serde(rename = "ownerId")]
    pub owner_id: String,
    pub title: String,
    pub category: String,
    pub url: String,
    #[serde(rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(rename = "sizeBytes", skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Document metadata creation data.
#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub owner_id: String,
    pub title: String,
    pub category: String,
    pub url: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<u64>,
}

/// Document metadata update data.
#[derive(Debug, Clone, Default)]
pub struct UpdateDocument {
    pub title: Option<String>,
    pub category: Option<String>,
    pub url: Option<String>,
    pub content_type: Option<String>,
    pub size_bytes: Option<u64>,
}

/// The business profile, at most one per owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessProfile {
    #[serde(rename = "ownerId")]
    pub owner_id: String,
    #[serde(rename = "companyName")]
    pub company_name: String,
    #[serde(rename = "registrationNumber", skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Business profile upsert data.
#[derive(Debug, Clone)]
pub struct UpsertBusinessProfile {
    pub owner_id: String,
    pub company_name: String,
    pub registration_number: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub about: Option<String>,
}
