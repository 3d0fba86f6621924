//! Business modules, one per feature area.

pub mod assets;
pub mod documents;
pub mod helpers;
pub mod invitations;
pub mod profile;
pub mod team;
pub mod vendors;

#[cfg(test)]
pub mod test_helpers;
