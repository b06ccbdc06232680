//! Tiered formula resolution: WEP, GPO, and employer match

mod gpo;
mod matching;
mod tiered;
mod wep;

pub use gpo::{gpo_offset, GpoComputation};
pub use matching::{employer_match, MatchComputation};
pub use tiered::{resolve_linear, walk_brackets, BracketShare, Resolution, Segment};
pub use wep::{wep_reduction, WepComputation};
