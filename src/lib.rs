pub mod backend;
pub mod board;
pub mod error;
pub mod models;
pub mod schema;
pub mod store;
