//! Records handed back to the driver and their textual forms.

use std::fmt;

/// Confirmation of a successful announced placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
  pub size: usize,
  pub placed_at: u64,
  pub location: usize,
  pub departs_at: u64,
}

impl fmt::Display for Placement {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(
      f,
      "Segment of size {:>4} placed at time {:>4} at location {:>4}, departs at {:>4}",
      self.size, self.placed_at, self.location, self.departs_at
    )
  }
}

/// A live segment as reported by [`Memory::layout`](crate::Memory::layout).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentInfo {
  pub location: usize,
  pub size: usize,
  pub departs_at: u64,
}

impl fmt::Display for SegmentInfo {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "{}\t{}\t{}", self.location, self.size, self.departs_at)
  }
}

/// Outcome of a random walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalkReport {
  pub placements: u64,
  /// Sum of `size * lifetime` over every placed segment.
  pub space_time: u64,
  pub final_clock: u64,
}

impl WalkReport {
  /// Average number of occupied addresses per clock tick.
  pub fn mean_occupancy(&self) -> f64 {
    if self.final_clock == 0 {
      return 0.0;
    }
    self.space_time as f64 / self.final_clock as f64
  }
}

impl fmt::Display for WalkReport {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    writeln!(f, "Number of placements made = {:>6}", self.placements)?;
    write!(f, "Mean occupancy of memory = {:>8.2}", self.mean_occupancy())
  }
}
