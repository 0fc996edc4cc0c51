//! # ToMo Common Library
//!
//! Core of the Total Motivation (ToMo) self-assessment:
//! - Question catalog and weighted scoring
//! - Submission model and the append-only submission store
//! - Assessment flow state machine and admin gate
//! - Dashboard aggregation over an injected plotting collaborator
//! - Configuration loading, events and shared error types

pub mod admin;
pub mod catalog;
pub mod config;
pub mod dashboard;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod events;
pub mod flow;
pub mod scoring;
pub mod store;
pub mod submission;
pub mod time;

pub use catalog::QuestionCatalog;
pub use error::{Error, Result};
pub use flow::{FlowController, FlowError, Notice, Page};
pub use store::SubmissionStore;
pub use submission::Submission;
