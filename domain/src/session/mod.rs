//! Chat session value objects

pub mod message;
