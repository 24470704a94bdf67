//! # Atrium Testkit
//!
//! In-memory implementations of every Atrium collaborator, plus a
//! pre-wired [`TestBed`] for exercising the full operation surface.
//! These exist for tests only: the stores hold state behind a single
//! `tokio::sync::RwLock` so each mutation is one atomic write, the
//! permission oracle and plan catalog answer from scripted sets, and
//! the event recorder keeps what it saw.

pub mod engine;
pub mod events;
pub mod flags;
pub mod harness;
pub mod permissions;
pub mod plans;
pub mod stores;

pub use engine::ScriptedEngine;
pub use events::{AuditRecord, RecordingEvents};
pub use flags::StaticFlags;
pub use harness::TestBed;
pub use permissions::ScriptedPermissions;
pub use plans::StaticPlans;
pub use stores::{InMemoryInstances, InMemorySpaces};
