pub mod config;
pub mod connection;
pub mod error;
pub mod schema;
pub mod seeder;
pub mod verify;
pub mod words;

// Re-export key types for convenience
pub use connection::SeedConnection;
pub use error::{Result, SeedError};
pub use schema::DatabaseType;
pub use seeder::{SeedReport, Seeder, Step, StepOutcome};
