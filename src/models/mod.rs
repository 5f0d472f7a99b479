//! SeaORM entities

pub mod sessions;
pub mod todos;
pub mod users;
