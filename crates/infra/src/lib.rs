//! `guarita-infra` — in-memory adapters for the external collaborators.
//!
//! Intended for dev/tests. Real deployments swap these for persistent
//! implementations of the same traits.

pub mod audit_sink;
pub mod mailer;
pub mod policy_store;
pub mod senha;
pub mod user_store;

pub use audit_sink::MemoryAuditSink;
pub use mailer::LogMailer;
pub use policy_store::{MemoryPolicyStore, seed_profile};
pub use senha::BasicPasswordScorer;
pub use user_store::MemoryUserStore;
