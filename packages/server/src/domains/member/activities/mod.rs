//! Member domain activities - business logic functions
//!
//! Activities take `&ServerDeps` and are called directly from HTTP routes.
//! The relationship engine is split into identifier generation, create-time
//! family id determination, update-time recomputation, and the validation
//! gate that runs before every write.

pub mod create_member;
pub mod determine_family_id;
pub mod identifiers;
pub mod link_spouses;
pub mod queries;
pub mod recompute_family_id;
pub mod update_member;
pub mod validate_relationships;

pub use create_member::create_member;
pub use determine_family_id::determine_family_id;
pub use identifiers::{generate_family_id, generate_member_id};
pub use link_spouses::link_spouses;
pub use queries::{delete_family, delete_member, get_member, list_family, list_members};
pub use recompute_family_id::recompute_family_id_on_status_change;
pub use update_member::update_member;
pub use validate_relationships::{validate_relationships, MemberLinks};
