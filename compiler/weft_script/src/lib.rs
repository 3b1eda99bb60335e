//! Weft Script - Test Script Representation
//!
//! A script wraps modules in an ordered command sequence: definitions,
//! runtime actions against their exports, and assertions about how
//! decoding, validation, linking, and execution should behave. This is the
//! in-memory form of conformance test scripts; running them is an
//! interpreter concern and lives elsewhere.

mod action;
mod command;

pub use action::{Action, ActionKind};
pub use command::{Command, Script, ScriptModule};
