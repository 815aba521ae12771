//! Matching engine that pairs missing-person reports with unidentified-person
//! findings.
//!
//! The crate is a library-level component: record CRUD, authentication, and
//! messaging transports live in outside collaborators. What lives here is the
//! cross-entity matching pipeline (geo scoring, attribute matching, ranking,
//! audit persistence, owner notification) and the administrator review
//! workflow over persisted matches.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
