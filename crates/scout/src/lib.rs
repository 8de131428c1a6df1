//! Scout — candidate-acquisition pipeline over the GitHub API.
//!
//! Given structured job requirements, Scout builds a bounded set of search
//! queries, deduplicates the candidates they surface, enriches each one from
//! the profile / repository / activity endpoints in rate-limited batches,
//! and ranks the results with a weighted multi-factor score.
//!
//! Everything remote goes through a two-tier (memory + disk) TTL cache, and
//! every call and stage reports timings to a pluggable `PerfSink`. Entry
//! point: [`pipeline::Pipeline`].

pub mod cache;
pub mod config;
pub mod enrich;
pub mod errors;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod query;
pub mod scoring;
pub mod search;
pub mod source;
pub mod telemetry;
pub mod vocab;

pub use config::Config;
pub use errors::ScoutError;
pub use models::candidate::{CandidateProfile, ScoredCandidate};
pub use models::requirements::{ExperienceLevel, JobRequirements, YearsRange};
pub use pipeline::Pipeline;
