pub mod identity;

pub use identity::{CurrentAdmin, CurrentMember};
