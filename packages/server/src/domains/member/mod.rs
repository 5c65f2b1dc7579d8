//! Member domain - registry of members grouped into families
//!
//! Architecture:
//!   HTTP route → activity → relationship engine → BaseMemberStore

pub mod activities;
pub mod data;
pub mod models;

// Re-export commonly used types
pub use data::{CreateMemberInput, DeletedCount, MemberData};
pub use models::{MaritalStatus, Member, MemberPatch, MemberWrite, NewMember};
