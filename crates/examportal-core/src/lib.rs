//! examportal-core: scoring, aggregation, and storage for exam submissions.
//!
//! Submitted answers are scored against reference answers for textual
//! similarity and for unrecognized tokens, combined into one performance
//! record per (subject, student), and folded into per-subject aggregates
//! stored as flat CSV files.

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod grammar;
pub mod model;
pub mod parser;
pub mod recorder;
pub mod session;
pub mod similarity;
pub mod store;
pub mod traits;

pub use error::{PortalError, Result};
