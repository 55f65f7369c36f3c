//! Conversation session domain.
//!
//! - [`entities::Session`]: the ordered turn history of one browser client
//! - [`entities::Turn`]: a single role-tagged message within a session
//! - [`entities::SessionId`]: the opaque client token identifying a session
//! - [`policy::SessionPolicy`]: capacity and idle-expiry bounds for stores

pub mod entities;
pub mod policy;
