//! voxgate: voice agent configuration and synchronization engine.
//!
//! Configures a hosted voice-agent resource and mirrors it into an external
//! voice-orchestration platform: tier-gated capability resolution, tool
//! enablement policy, validated multi-entity saves with per-write outcomes,
//! deletion coordination against racing reads, and idempotent
//! create-or-update reconciliation with the remote system of record.

pub mod agents;
pub mod cache;
pub mod capability;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod deletion;
pub mod errors;
pub mod gateway;
pub mod infra;
pub mod logging;
pub mod reads;
pub mod remote;
pub mod save;
pub mod selection;
pub mod stores;
