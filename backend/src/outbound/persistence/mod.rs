//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between Diesel rows (`models`, `schema`) and domain
//! types; they hold no business rules. Connections come from a bb8 pool via
//! `diesel-async`.
//!
//! ```ignore
//! use studyquest::outbound::persistence::{DbPool, DieselSectionRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/studyquest")).await?;
//! let sections = DieselSectionRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_exercise_repository;
mod diesel_section_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_exercise_repository::DieselExerciseRepository;
pub use diesel_section_repository::DieselSectionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
