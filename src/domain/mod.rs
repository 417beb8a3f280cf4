pub mod booking;
pub mod event;
pub mod member;
pub mod notification;
pub mod participation;
pub mod role;

pub use booking::*;
pub use event::*;
pub use member::*;
pub use notification::*;
pub use participation::*;
pub use role::*;
