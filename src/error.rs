//! Error types for the arena and the driver.

use thiserror::Error;

/// Precondition violations reported by [`Memory`](crate::Memory).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
  /// A segment must cover at least one address.
  #[error("segment size must be positive")]
  ZeroSize,

  /// An arena must span at least one address.
  #[error("memory capacity must be positive")]
  ZeroCapacity,
}

/// Errors raised while driving a simulation.
#[derive(Error, Debug)]
pub enum SimError {
  /// A command needs an arena, but none was created yet
  #[error("no memory has been created yet")]
  NoMemory,

  /// The segment can never be placed, so the retry loop would not end
  #[error("segment size {size} does not fit a memory of capacity {capacity}")]
  InvalidSize {
    /// Requested segment size
    size: usize,
    /// Capacity of the current memory
    capacity: usize,
  },

  #[error("invalid random walk parameters: {0}")]
  InvalidWalk(String),

  /// A line of the command stream could not be parsed
  #[error("bad command {line:?}: {reason}")]
  Command {
    /// The offending input line
    line: String,
    /// What was wrong with it
    reason: String,
  },

  #[error(transparent)]
  Memory(#[from] MemoryError),

  #[error("output error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
