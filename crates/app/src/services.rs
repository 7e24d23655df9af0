//! Application services — use-case entry points for rule authoring.

pub mod rule_service;

pub use rule_service::RuleService;
