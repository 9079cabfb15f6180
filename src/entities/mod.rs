pub mod parking_spot;
pub mod user;
