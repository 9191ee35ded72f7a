/// Stable handle of a region inside the [`Memory`](crate::Memory) slab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegionId(pub(crate) usize);

/// What a region currently holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionKind {
  Hole,
  Segment { departs_at: u64 },
}

/// An address-contiguous slice of the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
  pub location: usize,
  pub size: usize,
  pub kind: RegionKind,
  pub(crate) next: Option<RegionId>,
}

impl Region {
  pub fn hole(
    location: usize,
    size: usize,
    next: Option<RegionId>,
  ) -> Self {
    Self {
      location,
      size,
      kind: RegionKind::Hole,
      next,
    }
  }

  pub fn segment(
    location: usize,
    size: usize,
    departs_at: u64,
    next: Option<RegionId>,
  ) -> Self {
    Self {
      location,
      size,
      kind: RegionKind::Segment { departs_at },
      next,
    }
  }

  pub fn is_hole(&self) -> bool {
    matches!(self.kind, RegionKind::Hole)
  }

  /// Departure time, `None` for holes.
  pub fn departs_at(&self) -> Option<u64> {
    match self.kind {
      RegionKind::Hole => None,
      RegionKind::Segment { departs_at } => Some(departs_at),
    }
  }

  /// One past the last address covered by this region.
  pub fn end(&self) -> usize {
    self.location + self.size
  }

  /// A segment whose departure time has been reached.
  pub fn is_due(
    &self,
    now: u64,
  ) -> bool {
    self.departs_at().is_some_and(|departs_at| departs_at <= now)
  }

  /// Free now, or free as soon as `now` is applied.
  pub fn is_hole_or_due(
    &self,
    now: u64,
  ) -> bool {
    self.is_hole() || self.is_due(now)
  }

  pub fn fits(
    &self,
    size: usize,
  ) -> bool {
    self.is_hole() && self.size >= size
  }
}
