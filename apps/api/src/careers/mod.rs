// Career engine: skill aggregation, weighted career scoring, gap-driven learning plans.
// Everything in this module is pure computation except the `ResourceLookup` seam,
// which handlers back with Postgres.

pub mod catalog;
pub mod gap_planner;
pub mod handlers;
pub mod scoring;
pub mod skills;

use thiserror::Error;

/// Recoverable conditions raised by the career engine.
/// Converted into `AppError` at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CareerError {
    #[error("No skills found in the supplied sources")]
    NoSkillsFound,

    #[error("No career matched any of the user's skills")]
    NoMatchingCareer,

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Career not found: {0}")]
    CareerNotFound(String),
}
