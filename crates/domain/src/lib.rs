//! # rulehub-domain
//!
//! Pure domain model for the rulehub automation engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Rules** (trigger → condition → action chain, per tenant or global)
//! - Define **Events** (domain occurrences consumed by the engine)
//! - Define **Executions** (the outcome record of one rule firing)
//! - Condition evaluation and `{{fieldPath}}` template interpolation
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod event;
pub mod execution;
pub mod rule;
pub mod template;
