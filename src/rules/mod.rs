//! Routing rule maintenance.
//!
//! The provider accepts a flag-only `{"enabled": bool}` update for most rules, but rejects it
//! for some older ones with a client error. Those need the complete rule sent back, reduced to
//! the fields the update endpoint accepts ([`RulePayload`]).
//! [`update_rule_enabled`] tries the cheap update first and only resolves and resubmits the full
//! rule when that fails. [`update_existing_rule_enabled`] looks the rule up before writing, so a
//! rule that doesn't exist is never sent an update.

pub mod payload;
pub mod update;

pub use payload::RulePayload;
pub use update::{resolve_rule_for_update, update_existing_rule_enabled, update_rule_enabled};
