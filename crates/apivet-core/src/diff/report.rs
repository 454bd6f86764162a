//! Flattening of residual diff trees into report lines.

use crate::diff::engine::diff;
use crate::diff::model::{DiffKind, DiffNode};
use crate::diff::pruner::{prune, IgnoreMissingPruner, IgnorePruner};
use crate::errors::Result;
use serde_json::Value;

/// Flatten the residual tree into `-`/`+` lines, one pair per differing
/// leaf. Ignored and clean subtrees emit nothing; an empty report means
/// the comparison passed.
pub fn render_report(tree: &DiffNode) -> Vec<String> {
    let mut out = Vec::new();
    emit(tree, &mut out);
    out
}

fn emit(node: &DiffNode, out: &mut Vec<String>) {
    if node.is_clean() {
        return;
    }
    if !node.children.is_empty() {
        for child in &node.children {
            emit(child, out);
        }
        return;
    }

    let path = if node.path.is_empty() { "." } else { node.path.as_str() };
    match node.kind {
        DiffKind::ContentDiffer | DiffKind::TypeDiffer => {
            out.push(format!("- {path}: {}", render_value(&node.lhs)));
            out.push(format!("+ {path}: {}", render_value(&node.rhs)));
        }
        DiffKind::Missing => out.push(format!("- {path}: {}", render_value(&node.lhs))),
        DiffKind::Excess => out.push(format!("+ {path}: {}", render_value(&node.rhs))),
        DiffKind::Identical | DiffKind::Ignored => {}
    }
}

fn render_value(value: &Option<Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "<absent>".to_string(),
    }
}

/// Full body-comparison pipeline: structural diff, explicit ignore rules,
/// ignore-missing rules, default pruning policy, report.
///
/// # Errors
///
/// `DepthExceeded` when either value nests past the engine's guard.
pub fn compare_bodies(
    ignore: &[String],
    ignore_missing: &[String],
    ignore_null: bool,
    lhs: &Value,
    rhs: &Value,
) -> Result<Vec<String>> {
    let mut tree = diff(lhs, rhs)?;
    IgnorePruner(ignore).prune(&mut tree);
    IgnoreMissingPruner(ignore_missing).prune(&mut tree);
    prune(&mut tree, ignore_null);
    Ok(render_report(&tree))
}
