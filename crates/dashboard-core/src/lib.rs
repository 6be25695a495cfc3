pub mod dates;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
