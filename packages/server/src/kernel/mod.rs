//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod random;
pub mod test_dependencies;
pub mod traits;

pub use deps::{PgMemberStore, ServerDeps, DEFAULT_MEMBER_ID_ATTEMPTS};
pub use random::StdRandomSource;
pub use test_dependencies::{InMemoryMemberStore, SequenceRandom, TestDependencies};
pub use traits::*;
