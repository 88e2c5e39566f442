// ABOUTME: Data layer bootstrap for FormIQ: pool setup, migrations, seed data
// ABOUTME: Domain storage structs live in formiq-projects; this package owns the plumbing

pub mod db;
pub mod error;
pub mod seed;

pub use db::{connect, run_migrations};
pub use error::StorageError;
pub use seed::{seed, INTAKE_FORM_NAME};
