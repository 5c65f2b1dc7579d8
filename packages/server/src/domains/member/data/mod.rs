pub mod member;

pub use member::{CreateMemberInput, DeletedCount, MemberData};
