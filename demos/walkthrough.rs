use std::io::Read;

use nextfit::{Memory, RegionKind};

/// Waits until the user presses ENTER.
/// Gives time to read the layout printed by each step before moving on.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

/// Prints every region, holes included, as a single address map.
fn print_map(
  label: &str,
  memory: &Memory,
) {
  println!("[{label}]");
  for region in memory.regions() {
    match region.kind {
      RegionKind::Hole => println!("  {:>4}..{:<4} hole", region.location, region.end()),
      RegionKind::Segment { departs_at } => println!(
        "  {:>4}..{:<4} segment, departs at {}",
        region.location,
        region.end(),
        departs_at
      ),
    }
  }
}

/// Same loop the simulator runs: tick, expire, retry until placed.
fn add(
  memory: &mut Memory,
  clock: &mut u64,
  size: usize,
  lifetime: u64,
) -> Result<(), nextfit::MemoryError> {
  *clock += 1;
  memory.advance_time(*clock);

  while !memory.try_place(size, *clock, *clock + lifetime, true)? {
    *clock += 1;
    memory.advance_time(*clock);
  }

  for placement in memory.drain_announcements() {
    println!("{placement}");
  }

  Ok(())
}

fn main() -> Result<(), nextfit::MemoryError> {
  let mut memory = Memory::new(100)?;
  let mut clock = 0;

  // A fresh memory is a single hole.
  print_map("start", &memory);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 1) Two placements fill the memory from the bottom up.
  // --------------------------------------------------------------------
  add(&mut memory, &mut clock, 20, 10)?;
  add(&mut memory, &mut clock, 50, 5)?;
  print_map("after two placements", &memory);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 2) 70 addresses do not fit anywhere. The clock runs until the second
  //    segment departs at 7 and its space merges with the trailing hole.
  // --------------------------------------------------------------------
  add(&mut memory, &mut clock, 70, 20)?;
  print_map("after waiting for room", &memory);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 3) Jump ahead: both segments are gone and the holes coalesce into one.
  // --------------------------------------------------------------------
  clock = 30;
  memory.advance_time(clock);
  print_map("at time 30", &memory);

  println!("\nEnd of walkthrough.");
  Ok(())
}
