//! Drives a [`Memory`] with a simulated clock.

use std::{
  io::{BufRead, Write},
  ops::ControlFlow,
};

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, error, info};

use crate::{
  command::{Command, WalkParams},
  config::SimConfig,
  error::{MemoryError, Result, SimError},
  memory::Memory,
  report::WalkReport,
};

pub struct Simulator<W> {
  out: W,
  config: SimConfig,
  memory: Option<Memory>,
  /// Simulated wall clock, starts at zero.
  clock: u64,
  placements: u64,
  space_time: u64,
  rng: StdRng,
}

impl<W: Write> Simulator<W> {
  pub fn new(
    out: W,
    config: SimConfig,
  ) -> Self {
    let rng = config
      .seed
      .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    Self {
      out,
      config,
      memory: None,
      clock: 0,
      placements: 0,
      space_time: 0,
      rng,
    }
  }

  pub fn clock(&self) -> u64 {
    self.clock
  }

  pub fn placements(&self) -> u64 {
    self.placements
  }

  pub fn memory(&self) -> Option<&Memory> {
    self.memory.as_ref()
  }

  pub fn into_inner(self) -> W {
    self.out
  }

  pub fn identify(&mut self) -> Result<()> {
    writeln!(self.out, "{}", self.config.name)?;
    Ok(())
  }

  /// Replaces the memory. The clock and counters carry over.
  pub fn create(
    &mut self,
    capacity: usize,
  ) -> Result<()> {
    self.memory = Some(Memory::new(capacity)?);
    info!(capacity, clock = self.clock, "memory created");
    Ok(())
  }

  /// Ticks the clock once, then keeps ticking until the segment fits.
  pub fn add_segment(
    &mut self,
    size: usize,
    lifetime: u64,
    announce: bool,
  ) -> Result<()> {
    let memory = self.memory.as_mut().ok_or(SimError::NoMemory)?;

    if size == 0 {
      return Err(MemoryError::ZeroSize.into());
    }
    if size > memory.capacity() {
      return Err(SimError::InvalidSize {
        size,
        capacity: memory.capacity(),
      });
    }

    self.clock += 1;
    memory.advance_time(self.clock);

    while !memory.try_place(size, self.clock, self.clock.saturating_add(lifetime), announce)? {
      self.clock += 1;
      memory.advance_time(self.clock);
    }
    self.placements += 1;

    for placement in memory.drain_announcements() {
      writeln!(self.out, "{placement}")?;
    }

    Ok(())
  }

  pub fn print_layout(&mut self) -> Result<()> {
    let memory = self.memory.as_ref().ok_or(SimError::NoMemory)?;

    for segment in memory.layout() {
      writeln!(self.out, "{segment}")?;
    }

    Ok(())
  }

  /// Runs a random workload on a fresh memory and prints its summary.
  ///
  /// Sizes are drawn from `[min_size, max_size]`, lifetimes from
  /// `[1, max_lifetime]`.
  pub fn random_walk(
    &mut self,
    params: WalkParams,
  ) -> Result<WalkReport> {
    validate_walk(&params)?;

    match self.memory.as_mut() {
      Some(memory) if memory.capacity() == params.capacity => memory.reset(),
      _ => self.memory = Some(Memory::new(params.capacity)?),
    }
    self.clock = 0;
    self.placements = 0;
    self.space_time = 0;

    while self.placements < params.placements {
      let size = self.rng.gen_range(params.min_size..=params.max_size);
      let lifetime = self.rng.gen_range(1..=params.max_lifetime);
      self.space_time = (size as u64)
        .checked_mul(lifetime)
        .and_then(|occupied| self.space_time.checked_add(occupied))
        .ok_or_else(|| SimError::InvalidWalk("space-time overflows".to_string()))?;

      self.add_segment(size, lifetime, false)?;
    }

    let report = WalkReport {
      placements: self.placements,
      space_time: self.space_time,
      final_clock: self.clock,
    };

    info!(
      placements = report.placements,
      final_clock = report.final_clock,
      mean_occupancy = report.mean_occupancy(),
      "random walk finished"
    );
    writeln!(self.out, "{report}")?;

    Ok(report)
  }

  pub fn execute(
    &mut self,
    command: Command,
  ) -> Result<ControlFlow<()>> {
    debug!(?command, clock = self.clock, "executing");

    match command {
      Command::Identify => self.identify()?,
      Command::Create { capacity } => self.create(capacity)?,
      Command::Add { size, lifetime } => self.add_segment(size, lifetime, true)?,
      Command::PrintLayout => self.print_layout()?,
      Command::RandomWalk(params) => {
        self.random_walk(params)?;
      }
      Command::Exit => return Ok(ControlFlow::Break(())),
    }

    Ok(ControlFlow::Continue(()))
  }

  /// Executes commands line by line until `E` or the end of `input`.
  pub fn run<R: BufRead>(
    &mut self,
    input: R,
  ) -> Result<()> {
    for line in input.lines() {
      let line = line?;
      if line.trim().is_empty() {
        continue;
      }

      match line.parse::<Command>().and_then(|command| self.execute(command)) {
        Ok(ControlFlow::Continue(())) => {}
        Ok(ControlFlow::Break(())) => break,
        Err(SimError::Io(err)) => return Err(SimError::Io(err)),
        Err(err) if self.config.keep_going => error!(%line, "{err}"),
        Err(err) => return Err(err),
      }
    }

    self.out.flush()?;
    Ok(())
  }
}

fn validate_walk(
  params: &WalkParams,
) -> Result<()> {
  let reason = if params.min_size == 0 {
    "minimum size must be positive"
  } else if params.min_size > params.max_size {
    "minimum size exceeds maximum size"
  } else if params.max_size > params.capacity {
    "maximum size exceeds memory size"
  } else if params.max_lifetime == 0 {
    "maximum lifetime must be positive"
  } else if (params.max_size as u64).checked_mul(params.max_lifetime).is_none() {
    "maximum size times maximum lifetime overflows"
  } else {
    return Ok(());
  };

  Err(SimError::InvalidWalk(reason.to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn simulator(
    seed: u64,
  ) -> Simulator<Vec<u8>> {
    Simulator::new(
      Vec::new(),
      SimConfig {
        name: "Tester".to_string(),
        seed: Some(seed),
        keep_going: false,
      },
    )
  }

  fn run_script(
    script: &str,
  ) -> String {
    let mut sim = simulator(0);
    sim.run(script.as_bytes()).unwrap();
    String::from_utf8(sim.into_inner()).unwrap()
  }

  #[test]
  fn test_reference_script() {
    let output = run_script("N\nC 100\nA 20 10\nA 50 5\nA 70 20\nP\nE\n");

    assert_eq!(
      output,
      "Tester\n\
       Segment of size   20 placed at time    1 at location    0, departs at   11\n\
       Segment of size   50 placed at time    2 at location   20, departs at    7\n\
       Segment of size   70 placed at time    7 at location   20, departs at   27\n\
       0\t20\t11\n\
       20\t70\t27\n"
    );
  }

  #[test]
  fn test_extended_script() {
    let script = "N\nC 100\nA 20 10\nA 50 5\nA 70 20\nA 100 10\nA 25 5\nA 50 10\n\
                  A 25 5\nA 100 10\nA 50 10\nA 25 10\nA 100 10\nA 100 10\nP\nE\n";

    assert_eq!(
      run_script(script),
      "Tester\n\
       Segment of size   20 placed at time    1 at location    0, departs at   11\n\
       Segment of size   50 placed at time    2 at location   20, departs at    7\n\
       Segment of size   70 placed at time    7 at location   20, departs at   27\n\
       Segment of size  100 placed at time   27 at location    0, departs at   37\n\
       Segment of size   25 placed at time   37 at location    0, departs at   42\n\
       Segment of size   50 placed at time   38 at location   25, departs at   48\n\
       Segment of size   25 placed at time   39 at location   75, departs at   44\n\
       Segment of size  100 placed at time   48 at location    0, departs at   58\n\
       Segment of size   50 placed at time   58 at location    0, departs at   68\n\
       Segment of size   25 placed at time   59 at location   50, departs at   69\n\
       Segment of size  100 placed at time   69 at location    0, departs at   79\n\
       Segment of size  100 placed at time   79 at location    0, departs at   89\n\
       0\t100\t89\n"
    );
  }

  #[test]
  fn test_stops_at_exit() {
    assert_eq!(run_script("N\nE\nN\n"), "Tester\n");
    assert_eq!(run_script("\nN\n\n"), "Tester\n");
  }

  #[test]
  fn test_create_keeps_clock() {
    let mut sim = simulator(0);

    sim.create(100).unwrap();
    sim.add_segment(10, 5, false).unwrap();
    sim.create(50).unwrap();
    sim.add_segment(50, 5, true).unwrap();

    assert_eq!(sim.clock(), 2);
    assert_eq!(sim.placements(), 2);
    assert_eq!(sim.memory().unwrap().occupied(), 50);
    assert_eq!(
      String::from_utf8(sim.into_inner()).unwrap(),
      "Segment of size   50 placed at time    2 at location    0, departs at    7\n"
    );
  }

  #[test]
  fn test_add_rejects_impossible_sizes() {
    let mut sim = simulator(0);

    assert!(matches!(sim.add_segment(10, 5, true), Err(SimError::NoMemory)));
    assert!(matches!(sim.print_layout(), Err(SimError::NoMemory)));

    sim.create(100).unwrap();

    assert!(matches!(
      sim.add_segment(101, 5, true),
      Err(SimError::InvalidSize {
        size: 101,
        capacity: 100
      })
    ));
    assert!(matches!(
      sim.add_segment(0, 5, true),
      Err(SimError::Memory(MemoryError::ZeroSize))
    ));
    assert!(matches!(
      sim.create(0),
      Err(SimError::Memory(MemoryError::ZeroCapacity))
    ));
    assert_eq!(sim.clock(), 0);
  }

  #[test]
  fn test_run_halts_on_bad_command() {
    let mut sim = simulator(0);

    let err = sim.run("N\nZ 1\nN\n".as_bytes()).unwrap_err();

    assert!(matches!(err, SimError::Command { .. }));
    assert_eq!(String::from_utf8(sim.into_inner()).unwrap(), "Tester\n");
  }

  #[test]
  fn test_run_keeps_going() {
    let mut sim = Simulator::new(
      Vec::new(),
      SimConfig {
        name: "Tester".to_string(),
        seed: Some(0),
        keep_going: true,
      },
    );

    sim.run("N\nZ 1\nA 5 5\nC 10\nA 5 5\nE\n".as_bytes()).unwrap();

    assert_eq!(
      String::from_utf8(sim.into_inner()).unwrap(),
      "Tester\n\
       Segment of size    5 placed at time    1 at location    0, departs at    6\n"
    );
  }

  #[test]
  fn test_random_walk_accounting() {
    let params = WalkParams {
      capacity: 100,
      min_size: 5,
      max_size: 25,
      max_lifetime: 20,
      placements: 2000,
    };

    let mut sim = simulator(7);
    let report = sim.random_walk(params).unwrap();

    let mut rng = StdRng::seed_from_u64(7);
    let mut expected_space_time = 0;
    for _ in 0..params.placements {
      let size: usize = rng.gen_range(5..=25);
      let lifetime: u64 = rng.gen_range(1..=20);
      expected_space_time += size as u64 * lifetime;
    }

    assert_eq!(report.placements, 2000);
    assert_eq!(report.space_time, expected_space_time);
    assert_eq!(report.final_clock, sim.clock());
    assert!(report.final_clock >= report.placements);
    assert_eq!(
      report.mean_occupancy(),
      report.space_time as f64 / report.final_clock as f64
    );

    let output = String::from_utf8(sim.into_inner()).unwrap();
    assert_eq!(output, format!("{report}\n"));
    assert!(output.starts_with("Number of placements made =   2000\n"));
  }

  #[test]
  fn test_random_walk_resets_state() {
    let params = WalkParams {
      capacity: 1000,
      min_size: 5,
      max_size: 100,
      max_lifetime: 80,
      placements: 500,
    };

    let mut first = simulator(11);
    first.create(10).unwrap();
    first.add_segment(10, 3, false).unwrap();
    let a = first.random_walk(params).unwrap();

    let mut second = simulator(11);
    let b = second.random_walk(params).unwrap();

    assert_eq!(a, b);
    assert_eq!(first.placements(), 500);
    assert_eq!(first.memory().unwrap().capacity(), 1000);
  }

  #[test]
  fn test_random_walk_rejects_overflowing_lifetime() {
    let command: Command = "R 100 100 100 18446744073709551615 1".parse().unwrap();
    let mut sim = simulator(0);

    assert!(matches!(sim.execute(command), Err(SimError::InvalidWalk(_))));
    assert_eq!(sim.placements(), 0);
  }

  #[test]
  fn test_random_walk_rejects_overflowing_space_time() {
    // Each product fits, but the running sum cannot hold 64 of them.
    let params = WalkParams {
      capacity: 6400,
      min_size: 100,
      max_size: 100,
      max_lifetime: u64::MAX / 100,
      placements: 64,
    };

    let mut sim = simulator(3);

    assert!(matches!(sim.random_walk(params), Err(SimError::InvalidWalk(_))));
    assert!(sim.placements() < 64);
  }

  #[test]
  fn test_random_walk_reuses_memory_of_same_capacity() {
    let params = WalkParams {
      capacity: 100,
      min_size: 5,
      max_size: 25,
      max_lifetime: 20,
      placements: 50,
    };

    let mut reused = simulator(5);
    reused.create(100).unwrap();
    reused.add_segment(60, 1000, false).unwrap();
    let a = reused.random_walk(params).unwrap();

    let mut fresh = simulator(5);
    let b = fresh.random_walk(params).unwrap();

    assert_eq!(a, b);
    assert_eq!(
      reused.memory().unwrap().layout(),
      fresh.memory().unwrap().layout()
    );
  }

  #[test]
  fn test_random_walk_validation() {
    let valid = WalkParams {
      capacity: 100,
      min_size: 5,
      max_size: 25,
      max_lifetime: 20,
      placements: 10,
    };

    let invalid = [
      WalkParams {
        min_size: 0,
        ..valid
      },
      WalkParams {
        min_size: 30,
        ..valid
      },
      WalkParams {
        max_size: 101,
        ..valid
      },
      WalkParams {
        max_lifetime: 0,
        ..valid
      },
    ];

    let mut sim = simulator(0);
    for params in invalid {
      assert!(matches!(
        sim.random_walk(params),
        Err(SimError::InvalidWalk(_))
      ));
    }

    assert!(sim.random_walk(valid).is_ok());
  }
}
