// Library root: the player value projection engine.
//
// Data flows one way: identity resolution -> statistical adjustment ->
// WAR composition -> value grading. Every stage is a pure function of its
// inputs and the read-only lookup tables.

pub mod adjustment;
pub mod aging;
pub mod config;
pub mod constants;
pub mod grading;
pub mod identity;
pub mod loader;
pub mod position;
pub mod projection;
pub mod seasons;
pub mod tables;
pub mod trajectory;
pub mod war;

pub use grading::GradeTier;
pub use identity::{PlayerId, PlayerIdentity};
pub use position::Position;
pub use projection::{project, project_all, ProjectionContext, ProjectionResult, StatLine};
pub use tables::LookupTables;
