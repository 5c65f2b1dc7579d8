pub mod member;

pub use member::{MaritalStatus, Member, MemberPatch, MemberWrite, NewMember};
