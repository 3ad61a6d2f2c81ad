//! Ticket domain - board entities and their identifiers

pub mod entities;
pub mod value_objects;
