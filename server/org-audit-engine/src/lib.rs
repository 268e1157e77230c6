//! Org Audit Engine — deterministic organizational hierarchy audit.
//!
//! Maps a flat employee table into typed records, validates referential integrity,
//! builds the manager -> report graph, computes structural metrics (span of control,
//! depth, cost per level, duplicate roles) and flags anomalies.
//!
//! No AI, no DB, no network; pure computation. The summarizer prompt is built here;
//! sending it is the host's job.

pub mod anomaly;
pub mod config;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod graph;
pub mod metrics;
pub mod normalize;
pub mod presentation;
pub mod summary;
pub mod types;
pub mod validate;

pub use config::{AuditConfig, LevelCheck, PromptStyle, TableOrder};
pub use engine::Auditor;
pub use error::{AuditError, SummarizerError};
pub use graph::OrgGraph;
pub use summary::SummaryOutcome;
pub use types::{AuditReport, EmployeeId, EmployeeRecord, InboundTable, MetricsPayload};
