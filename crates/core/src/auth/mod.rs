//! Authentication ports

pub mod ports;

pub use ports::Authenticator;
