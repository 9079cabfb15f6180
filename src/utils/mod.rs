pub mod access;
pub mod geo;
pub mod jwt;
pub mod password;
