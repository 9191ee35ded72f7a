use std::vec;

use tracing::{debug, trace};

use crate::{
  error::MemoryError,
  region::{Region, RegionId, RegionKind},
  report::{Placement, SegmentInfo},
};

/// A contiguous arena of `capacity` addresses managed with next-fit placement.
///
/// Regions are kept in a slab and chained through `Region::next` in
/// ascending address order. Slots released by coalescing are recycled.
#[derive(Clone, Debug)]
pub struct Memory {
  capacity: usize,
  regions: Vec<Region>,
  vacant: Vec<RegionId>,
  head: RegionId,
  /// The last placed segment, or the hole that replaced or absorbed it.
  last_placement: RegionId,
  announcements: Vec<Placement>,
}

impl Memory {
  pub fn new(
    capacity: usize,
  ) -> Result<Self, MemoryError> {
    if capacity == 0 {
      return Err(MemoryError::ZeroCapacity);
    }

    Ok(Self {
      capacity,
      regions: vec![Region::hole(0, capacity, None)],
      vacant: Vec::new(),
      head: RegionId(0),
      last_placement: RegionId(0),
      announcements: Vec::new(),
    })
  }

  /// Drops every region and goes back to a single hole spanning the arena.
  pub fn reset(&mut self) {
    self.regions.clear();
    self.regions.push(Region::hole(0, self.capacity, None));
    self.vacant.clear();
    self.head = RegionId(0);
    self.last_placement = RegionId(0);
    self.announcements.clear();
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Places a segment of `size` with next-fit.
  ///
  /// The scan resumes right after the last placement. If that finds nothing
  /// it wraps around to the head, provided the head does not lie past the
  /// last placement. Returns `Ok(false)` when no hole is large enough; the
  /// caller is expected to advance time and retry.
  ///
  /// With `announce` set, a [`Placement`] is queued for
  /// [`drain_announcements`](Self::drain_announcements).
  pub fn try_place(
    &mut self,
    size: usize,
    current_time: u64,
    departure_time: u64,
    announce: bool,
  ) -> Result<bool, MemoryError> {
    if size == 0 {
      return Err(MemoryError::ZeroSize);
    }

    let resume_from = self.region(self.last_placement).next;
    let found = match self.find_fit(resume_from, size) {
      Some(hole) => Some(hole),
      None if self.region(self.head).location <= self.region(self.last_placement).location => {
        self.find_fit(Some(self.head), size)
      }
      None => None,
    };

    let Some(hole) = found else {
      trace!(size, current_time, "no hole large enough");
      return Ok(false);
    };

    let location = self.place_segment(hole, size, departure_time);

    debug!(
      size,
      current_time,
      location,
      departure_time,
      "segment placed"
    );

    if announce {
      self.announcements.push(Placement {
        size,
        placed_at: current_time,
        location,
        departs_at: departure_time,
      });
    }

    Ok(true)
  }

  /// Turns every segment due at `current_time` into a hole and coalesces
  /// neighbouring holes, in one pass from the head.
  pub fn advance_time(
    &mut self,
    current_time: u64,
  ) {
    let mut cursor = Some(self.head);

    while let Some(current) = cursor {
      let next = self.region(current).next;

      match next {
        Some(following)
          if self.region(current).is_hole_or_due(current_time)
            && self.region(following).is_hole_or_due(current_time) =>
        {
          // The merged hole may absorb what follows too, so stay on it.
          self.coalesce(current, following);
        }
        _ => {
          if self.region(current).is_due(current_time) {
            self.release(current, next);
          }
          cursor = next;
        }
      }
    }
  }

  /// Every live segment, ascending by location.
  pub fn layout(&self) -> Vec<SegmentInfo> {
    self
      .regions()
      .filter_map(|region| {
        region.departs_at().map(|departs_at| SegmentInfo {
          location: region.location,
          size: region.size,
          departs_at,
        })
      })
      .collect()
  }

  /// Every region, holes included, in address order.
  pub fn regions(&self) -> Regions<'_> {
    Regions {
      memory: self,
      cursor: Some(self.head),
    }
  }

  pub fn region_count(&self) -> usize {
    self.regions().count()
  }

  /// Total size of the live segments.
  pub fn occupied(&self) -> usize {
    self
      .regions()
      .filter(|region| !region.is_hole())
      .map(|region| region.size)
      .sum()
  }

  /// The region the next resume pass starts after.
  pub fn last_placement(&self) -> &Region {
    self.region(self.last_placement)
  }

  /// Placements announced since the previous drain, oldest first.
  pub fn drain_announcements(&mut self) -> vec::Drain<'_, Placement> {
    self.announcements.drain(..)
  }

  fn region(
    &self,
    id: RegionId,
  ) -> &Region {
    &self.regions[id.0]
  }

  /// First hole at or after `from` that can hold `size`.
  fn find_fit(
    &self,
    from: Option<RegionId>,
    size: usize,
  ) -> Option<RegionId> {
    let mut current = from;

    while let Some(id) = current {
      let region = self.region(id);
      if region.fits(size) {
        return Some(id);
      }
      current = region.next;
    }

    None
  }

  /// Rewrites `hole` into a segment, splitting off the unused tail.
  ///
  /// The hole's slot is reused for the segment, so a segment landing at
  /// address 0 keeps `head` valid without touching it.
  fn place_segment(
    &mut self,
    hole: RegionId,
    size: usize,
    departs_at: u64,
  ) -> usize {
    let (location, hole_size, after) = {
      let region = self.region(hole);
      (region.location, region.size, region.next)
    };

    let next = if hole_size > size {
      Some(self.insert(Region::hole(location + size, hole_size - size, after)))
    } else {
      after
    };

    self.regions[hole.0] = Region::segment(location, size, departs_at, next);
    self.last_placement = hole;

    location
  }

  /// Folds `following` into `current`, leaving a single hole.
  fn coalesce(
    &mut self,
    current: RegionId,
    following: RegionId,
  ) {
    let (size, after) = {
      let region = self.region(following);
      (region.size, region.next)
    };

    let region = &mut self.regions[current.0];
    region.size += size;
    region.kind = RegionKind::Hole;
    region.next = after;

    trace!(
      location = region.location,
      size = region.size,
      "holes coalesced"
    );

    self.vacant.push(following);
    if self.last_placement == following {
      self.last_placement = current;
    }
  }

  /// Turns an expired segment into a hole of the same extent.
  fn release(
    &mut self,
    current: RegionId,
    next: Option<RegionId>,
  ) {
    self.regions[current.0].kind = RegionKind::Hole;

    // A live successor that was the last placement hands over to the new hole.
    if next == Some(self.last_placement) {
      self.last_placement = current;
    }
  }

  fn insert(
    &mut self,
    region: Region,
  ) -> RegionId {
    match self.vacant.pop() {
      Some(id) => {
        self.regions[id.0] = region;
        id
      }
      None => {
        self.regions.push(region);
        RegionId(self.regions.len() - 1)
      }
    }
  }
}

/// Iterator over the regions of a [`Memory`] in address order.
pub struct Regions<'a> {
  memory: &'a Memory,
  cursor: Option<RegionId>,
}

impl<'a> Iterator for Regions<'a> {
  type Item = &'a Region;

  fn next(&mut self) -> Option<Self::Item> {
    let region = self.memory.region(self.cursor?);
    self.cursor = region.next;
    Some(region)
  }
}
