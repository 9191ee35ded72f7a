//! # nextfit - A Next-Fit Segment Placement Simulator
//!
//! This crate simulates a single contiguous memory managed by a **next-fit**
//! allocator. Segments arrive with a fixed lifetime, are placed into the
//! first hole large enough after the previous placement, and are reclaimed
//! once the simulated clock reaches their departure time.
//!
//! ## Overview
//!
//! ```text
//!   Memory of 100 addresses after three placements:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │   ┌──────────┬─────────────────────────┬──────────────────────────┐  │
//!   │   │ Segment  │        Segment          │          Hole            │  │
//!   │   │ 0..20    │        20..70           │        70..100           │  │
//!   │   │ dep 11   │        dep 7            │                          │  │
//!   │   └──────────┴─────────────────────────┴──────────────────────────┘  │
//!   │                          ▲                                           │
//!   │                          │                                           │
//!   │                   last placement                                     │
//!   │                (next scan starts after it)                           │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   nextfit
//!   ├── region     - Region, RegionKind, RegionId
//!   ├── memory     - Memory: placement, expiry and coalescing, layout
//!   ├── report     - Placement, SegmentInfo, WalkReport and their text forms
//!   ├── command    - line protocol (N, C, A, P, R, E)
//!   ├── simulator  - clock, retry loop and random walks
//!   ├── config     - CLI / environment settings
//!   └── error      - MemoryError, SimError
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use nextfit::Memory;
//!
//! let mut memory = Memory::new(100).unwrap();
//!
//! // Place 20 addresses at time 1, departing at time 11.
//! assert!(memory.try_place(20, 1, 11, false).unwrap());
//!
//! // Nothing is due at time 5.
//! memory.advance_time(5);
//! assert_eq!(memory.layout().len(), 1);
//!
//! // At time 11 the segment is gone and the memory is one hole again.
//! memory.advance_time(11);
//! assert!(memory.layout().is_empty());
//! assert_eq!(memory.region_count(), 1);
//! ```
//!
//! ## How It Works
//!
//! Placement scans forward from the region after the last placement and
//! wraps around to the start of memory when it reaches the end:
//!
//! ```text
//!                 resume pass ─────────────────────────▶
//!   ┌────────┬────────┬──────────┬────────┬──────────────┐
//!   │  Hole  │  Seg   │   Seg*   │  Seg   │     Hole     │   * last placement
//!   └────────┴────────┴──────────┴────────┴──────────────┘
//!    ─────────────────────────────▶ wrap pass (only if the resume pass failed)
//! ```
//!
//! Advancing time turns due segments into holes and merges neighbouring
//! holes in the same pass, so no two holes are ever adjacent:
//!
//! ```text
//!   before:  │ Hole │ Seg (due) │ Hole │ Seg │
//!   after:   │        Hole             │ Seg │
//! ```
//!
//! The [`Simulator`] owns the clock. It ticks once per request, then keeps
//! ticking and expiring until the segment fits.
//!
//! ## Limitations
//!
//! - **Single-threaded only**: one simulator owns one memory
//! - **Next-fit only**: no first-fit, best-fit or worst-fit policies
//! - **In-process only**: memory state is not persisted between runs

pub mod command;
pub mod config;
pub mod error;
mod memory;
mod region;
mod report;
mod simulator;

pub use command::{Command, WalkParams};
pub use config::{Cli, SimConfig};
pub use error::{MemoryError, SimError};
pub use memory::{Memory, Regions};
pub use region::{Region, RegionId, RegionKind};
pub use report::{Placement, SegmentInfo, WalkReport};
pub use simulator::Simulator;
