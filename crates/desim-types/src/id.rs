//! # desim-types::id
//!
//! Core identifier and priority types. A distinct type for event identity
//! avoids it being accidentally confused with a plain counter or a time
//! value elsewhere in the engine.

/// A unique identifier for a scheduled event, assigned monotonically by the
/// `Scheduler`'s id generator. Unique within a single run.
pub type EventId = u64;

/// The tie-break priority carried by an event. Lower values fire first.
pub type Priority = i32;

/// The default priority used when a caller does not specify one.
pub const DEFAULT_PRIORITY: Priority = 0;
