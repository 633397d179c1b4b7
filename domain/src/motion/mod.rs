//! Motions: the proposals a council votes on.
//!
//! A motion is born on a successful propose, mutated by vote casting and by
//! the resolver, and immutable once archived. The submodules keep the three
//! pure algorithms separate: majority parsing, weighted tallying, and the
//! two resolution policies (early majority vs. expiration).

pub mod entities;
pub mod majority;
pub mod resolution;
pub mod tally;

pub use entities::{MAX_TITLE_LEN, Motion, MotionStatus, VoteChoice};
pub use majority::{Majority, parse_majority};
pub use resolution::{early_outcome, expiration_outcome};
pub use tally::{Tally, weighted_tally};
