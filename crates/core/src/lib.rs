//! Core types and services for the SiteDesk backend.
//!
//! This crate holds everything that is independent of the HTTP surface:
//! the domain types, the [`store::StoreAdapter`] persistence seam and its
//! in-memory implementation, session management, configuration, and the
//! axum extractors the API crate builds its handlers on.

pub mod config;
pub mod email;
pub mod error;
pub mod extractors;
pub mod logger;
pub mod session;
pub mod state;
pub mod store;
pub mod types;
mod types_business;

pub use config::{AppConfig, InvitationConfig, SessionConfig};
pub use email::{ConsoleEmailProvider, EmailProvider};
pub use error::{ApiError, ApiResult, ErrorBody, StoreError};
pub use extractors::{CurrentSession, OptionalSession, ValidatedJson};
pub use logger::{default_logger, Logger, TracingLogger};
pub use session::SessionManager;
pub use state::AppState;
pub use store::{
    AssetOps, DocumentOps, InvitationOps, MemberOps, MemoryStore, ProfileOps, SessionOps,
    StoreAdapter, UserOps, VendorOps,
};
