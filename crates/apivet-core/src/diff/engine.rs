//! Structural diff computation.

use crate::diff::model::{ContainerKind, DiffKind, DiffNode};
use crate::errors::{ApivetError, Result};
use serde_json::Value;

/// Maximum value nesting the engine will recurse into.
///
/// Owned JSON trees cannot be cyclic, so pathological depth is the failure
/// mode that replaces cycle detection: past this bound the comparison
/// errors out instead of exhausting the stack.
pub const MAX_DEPTH: usize = 128;

/// Compute the comparison tree between a base (`lhs`) and target (`rhs`)
/// value.
///
/// # Errors
///
/// `DepthExceeded` when nesting passes [`MAX_DEPTH`].
pub fn diff(lhs: &Value, rhs: &Value) -> Result<DiffNode> {
    diff_at("", lhs, rhs, 0)
}

fn diff_at(path: &str, lhs: &Value, rhs: &Value, depth: usize) -> Result<DiffNode> {
    if depth > MAX_DEPTH {
        return Err(ApivetError::DepthExceeded {
            path: path.to_string(),
            max: MAX_DEPTH,
        });
    }

    match (lhs, rhs) {
        (Value::Null, Value::Null) => Ok(scalar(path, lhs, rhs)),
        (Value::Bool(_), Value::Bool(_))
        | (Value::Number(_), Value::Number(_))
        | (Value::String(_), Value::String(_)) => Ok(scalar(path, lhs, rhs)),

        (Value::Object(a), Value::Object(b)) => {
            let mut children = Vec::with_capacity(a.len().max(b.len()));
            for (key, a_val) in a {
                let child_path = format!("{path}.{key}");
                match b.get(key) {
                    Some(b_val) => children.push(diff_at(&child_path, a_val, b_val, depth + 1)?),
                    None => children.push(DiffNode::leaf(
                        child_path,
                        DiffKind::Missing,
                        Some(a_val.clone()),
                        None,
                    )),
                }
            }
            for (key, b_val) in b {
                if !a.contains_key(key) {
                    children.push(DiffNode::leaf(
                        format!("{path}.{key}"),
                        DiffKind::Excess,
                        None,
                        Some(b_val.clone()),
                    ));
                }
            }
            Ok(DiffNode::container(path, ContainerKind::Mapping, children))
        }

        (Value::Array(a), Value::Array(b)) => {
            let shared = a.len().min(b.len());
            let mut children = Vec::with_capacity(a.len().max(b.len()));
            for i in 0..shared {
                children.push(diff_at(&format!("{path}[{i}]"), &a[i], &b[i], depth + 1)?);
            }
            for (i, a_val) in a.iter().enumerate().skip(shared) {
                children.push(DiffNode::leaf(
                    format!("{path}[{i}]"),
                    DiffKind::Missing,
                    Some(a_val.clone()),
                    None,
                ));
            }
            for (i, b_val) in b.iter().enumerate().skip(shared) {
                children.push(DiffNode::leaf(
                    format!("{path}[{i}]"),
                    DiffKind::Excess,
                    None,
                    Some(b_val.clone()),
                ));
            }
            Ok(DiffNode::container(path, ContainerKind::Sequence, children))
        }

        // Anything else is a kind mismatch, null-vs-non-null included.
        _ => Ok(DiffNode::leaf(
            path,
            DiffKind::TypeDiffer,
            Some(lhs.clone()),
            Some(rhs.clone()),
        )),
    }
}

fn scalar(path: &str, lhs: &Value, rhs: &Value) -> DiffNode {
    let kind = if lhs == rhs {
        DiffKind::Identical
    } else {
        DiffKind::ContentDiffer
    };
    DiffNode::leaf(path, kind, Some(lhs.clone()), Some(rhs.clone()))
}
