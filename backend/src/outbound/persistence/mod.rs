//! PostgreSQL persistence adapters.
//!
//! Row structs and the Diesel schema stay private to this module; only the
//! repository, pool and migration runner are exported.

mod diesel_user_profile_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_profile_repository::DieselUserProfileRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
