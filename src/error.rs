//! Error types for entity construction and rule validation.
//!
//! Nothing in the per-frame simulation is fallible: a spawn that finds no
//! free slot simply yields no entity.  Errors only surface when something is
//! built from bad numbers.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    #[error("{axis}-coordinate must be non-negative, got {value}")]
    NegativeCoordinate { axis: char, value: i32 },

    #[error("size must be non-negative, got {width}x{height}")]
    NegativeSize { width: i32, height: i32 },

    #[error("speed must be non-negative, got {0}")]
    NegativeSpeed(i32),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RulesError {
    #[error("playfield must have a positive size, got {width}x{height}")]
    EmptyPlayfield { width: i32, height: i32 },

    #[error("invalid {what}: {source}")]
    Entity {
        what: &'static str,
        #[source]
        source: EntityError,
    },

    #[error("hero bottom margin must not be negative, got {0}")]
    NegativeMargin(i32),

    #[error("hero ({width}x{height}) does not fit in the playfield")]
    HeroDoesNotFit { width: i32, height: i32 },

    #[error("{what} spawn probability must be within [0, 1], got {value}")]
    InvalidProbability { what: &'static str, value: f64 },

    #[error("spawn attempts must be at least 1")]
    NoSpawnAttempts,
}
