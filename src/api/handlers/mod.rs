pub mod admin;
pub mod bookings;
pub mod events;
pub mod members;
pub mod participation;
pub mod root;
