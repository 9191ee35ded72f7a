//! The line-oriented command protocol.
//!
//! ```text
//!   N                                   print the operator name
//!   C <size>                            create a memory of <size> addresses
//!   A <size> <lifetime>                 add a segment, announcing its placement
//!   P                                   print the layout of live segments
//!   R <size> <min> <max> <life> <count> run a random walk on a fresh memory
//!   E                                   end of input
//! ```

use std::str::{FromStr, SplitWhitespace};

use crate::error::SimError;

/// Parameters of a random walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalkParams {
  pub capacity: usize,
  pub min_size: usize,
  pub max_size: usize,
  pub max_lifetime: u64,
  pub placements: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
  Identify,
  Create { capacity: usize },
  Add { size: usize, lifetime: u64 },
  PrintLayout,
  RandomWalk(WalkParams),
  Exit,
}

impl FromStr for Command {
  type Err = SimError;

  fn from_str(
    line: &str,
  ) -> Result<Self, Self::Err> {
    let mut args = Args {
      line,
      tokens: line.split_whitespace(),
    };

    let command = match args.tokens.next() {
      Some("N") => Command::Identify,
      Some("C") => Command::Create {
        capacity: args.number("size")?,
      },
      Some("A") => Command::Add {
        size: args.number("size")?,
        lifetime: args.number("lifetime")?,
      },
      Some("P") => Command::PrintLayout,
      Some("R") => Command::RandomWalk(WalkParams {
        capacity: args.number("size")?,
        min_size: args.number("minimum size")?,
        max_size: args.number("maximum size")?,
        max_lifetime: args.number("maximum lifetime")?,
        placements: args.number("placement count")?,
      }),
      Some("E") => Command::Exit,
      Some(other) => return Err(args.error(format!("unknown command {other:?}"))),
      None => return Err(args.error("empty line".to_string())),
    };

    args.finish()?;
    Ok(command)
  }
}

struct Args<'a> {
  line: &'a str,
  tokens: SplitWhitespace<'a>,
}

impl Args<'_> {
  fn number<T: FromStr>(
    &mut self,
    name: &str,
  ) -> Result<T, SimError> {
    let token = self
      .tokens
      .next()
      .ok_or_else(|| self.error(format!("missing {name}")))?;

    token
      .parse()
      .map_err(|_| self.error(format!("{name} must be a non-negative integer, got {token:?}")))
  }

  fn finish(mut self) -> Result<(), SimError> {
    match self.tokens.next() {
      Some(extra) => Err(self.error(format!("unexpected argument {extra:?}"))),
      None => Ok(()),
    }
  }

  fn error(
    &self,
    reason: String,
  ) -> SimError {
    SimError::Command {
      line: self.line.to_string(),
      reason,
    }
  }
}
