//! # desim-types::time
//!
//! Defines the representation of time within the simulation.
//! All simulation time is discrete and represented in nanoseconds, giving
//! high resolution while keeping comparisons exact integer comparisons —
//! deliberately not a float, since float equality would undermine the
//! ordering determinism the future-event set depends on.

use crate::errors::TimeError;
use serde::Deserializer;

/// The fundamental unit of time in the simulation, measured in nanoseconds.
/// A `u128` provides an enormous range, preventing overflow for any
/// practical simulation duration.
pub type SimTime = u128;

/// A signed, relative offset from the current simulation time. Kept signed
/// (rather than reusing `SimTime`) so that a caller-supplied negative delay
/// is representable and can be rejected as a `NegativeDelay` error instead
/// of being a type-level impossibility.
pub type SimDelay = i128;

/// The start of simulation time.
pub const SIM_EPOCH: SimTime = 0;

/// Converts a count of whole seconds to `SimTime`.
pub const fn from_secs(secs: u64) -> SimTime {
    (secs as u128) * 1_000_000_000
}

/// Converts a count of milliseconds to `SimTime`.
pub const fn from_millis(ms: u64) -> SimTime {
    (ms as u128) * 1_000_000
}

/// Converts a count of microseconds to `SimTime`.
pub const fn from_micros(us: u64) -> SimTime {
    (us as u128) * 1_000
}

/// Converts a count of nanoseconds to `SimTime`. Provided for symmetry with
/// the other constructors.
pub const fn from_nanos(ns: u64) -> SimTime {
    ns as u128
}

/// Performs a checked addition on `SimTime`, returning an error on overflow.
pub fn checked_add(base: SimTime, offset: SimTime) -> Result<SimTime, TimeError> {
    base.checked_add(offset)
        .ok_or(TimeError::Overflow { base, offset })
}

/// Performs a checked addition of a signed delay, returning an error on
/// overflow or if the result would be negative.
pub fn checked_add_delay(base: SimTime, delay: SimDelay) -> Result<SimTime, TimeError> {
    if delay >= 0 {
        base.checked_add(delay as u128)
            .ok_or(TimeError::Overflow {
                base,
                offset: delay as u128,
            })
    } else {
        base.checked_sub((-delay) as u128)
            .ok_or(TimeError::Underflow {
                base,
                offset: (-delay) as u128,
            })
    }
}

/// Custom deserializer for `SimTime` that accepts both `u64` and `u128`
/// values. TOML only supports integers up to `i64`, so values must be
/// handled manually to avoid truncation on the common cases and to reject
/// negative input explicitly.
pub fn deserialize_sim_time<'de, D>(deserializer: D) -> Result<SimTime, D::Error>
where
    D: Deserializer<'de>,
{
    struct SimTimeVisitor;

    impl<'de> serde::de::Visitor<'de> for SimTimeVisitor {
        type Value = SimTime;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a non-negative integer number of nanoseconds")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value as u128)
        }

        fn visit_u128<E>(self, value: u128) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if value < 0 {
                return Err(E::custom("SimTime cannot be negative"));
            }
            Ok(value as u128)
        }
    }

    deserializer.deserialize_any(SimTimeVisitor)
}
