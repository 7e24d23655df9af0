//! # rulehub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RuleRepository` — CRUD, event lookup, atomic counter increment
//!   - `ExecutionRepository` — execution bookkeeping with dedup
//!   - `EventPublisher` — publish engine events
//!   - collaborator ports behind built-in actions (notifications, mail,
//!     status transitions, tasks, webhooks)
//! - Define **driving/inbound ports** as use-case structs:
//!   - `RuleService` — authoring CRUD with validation
//!   - `EventDispatcher` — match rules against events, schedule chains
//!   - `ExecutionScheduler` — run one chain with delays, isolation, retries
//!   - `ExecutionRecorder` — persist outcomes, bump counters, history
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `rulehub-domain` only (plus `tokio::sync`/`time` for channels
//! and timers). Never imports adapter crates. Adapters depend on *this*
//! crate, not the reverse.

pub mod config;
pub mod dispatcher;
pub mod event_bus;
pub mod handlers;
pub mod ports;
pub mod recorder;
pub mod scheduler;
pub mod services;
#[cfg(test)]
pub(crate) mod testing;
