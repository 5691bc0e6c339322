//! One-way diff between the mirrored work events and the personal calendar.

mod diff_kind;
mod mirror_diff;

pub use diff_kind::DiffKind;
pub use mirror_diff::{MirrorDiff, diff};
