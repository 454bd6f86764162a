//! Structural diff over JSON-like values.
//!
//! [`engine::diff`] classifies every node of a comparison into a
//! [`model::DiffNode`] tree; [`pruner`] rewrites policy- or rule-ignored
//! nodes to `Ignored` without deleting them; [`report`] flattens the
//! residual tree into human-readable `-`/`+` lines.

pub mod engine;
pub mod model;
pub mod pruner;
pub mod report;

pub use engine::diff;
pub use model::{ContainerKind, DiffKind, DiffNode};
pub use pruner::{prune, IgnoreMissingPruner, IgnorePruner};
pub use report::{compare_bodies, render_report};
