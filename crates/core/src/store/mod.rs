pub mod memory;
pub mod traits;

pub use memory::MemoryStore;
pub use traits::{
    AssetOps, DocumentOps, InvitationOps, MemberOps, ProfileOps, SessionOps, StoreAdapter,
    UserOps, VendorOps,
};
