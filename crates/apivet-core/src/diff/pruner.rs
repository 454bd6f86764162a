//! Pruning passes over a comparison tree.
//!
//! Pruning never deletes a node: it rewrites the node's kind to
//! [`DiffKind::Ignored`] so aggregate cleanliness checks treat the subtree
//! as a non-issue while the tree stays walkable. The three passes are
//! applied in a fixed order by [`crate::diff::report::compare_bodies`]:
//! explicit ignore rules, then ignore-missing rules, then the default
//! noise-reduction policy.

use crate::diff::model::{ContainerKind, DiffKind, DiffNode};

/// Top-down walk; a node rewritten to `Ignored` is not descended into.
///
/// The visitor is infallible by construction; there is deliberately no
/// error channel here.
fn walk_mut<F>(node: &mut DiffNode, parent: ContainerKind, visit: &mut F)
where
    F: FnMut(&mut DiffNode, ContainerKind),
{
    visit(node, parent);
    if node.kind == DiffKind::Ignored {
        return;
    }
    let container = node.container;
    for child in &mut node.children {
        walk_mut(child, container, visit);
    }
}

/// True when `path` ends with any of the configured rule suffixes.
///
/// Rules are dotted-path suffixes: `.error` matches `.results[2].error`.
fn path_matches(rules: &[String], path: &str) -> bool {
    rules.iter().any(|rule| path.ends_with(rule.as_str()))
}

/// Ignores every node whose path matches one of the configured suffixes,
/// regardless of its kind.
pub struct IgnorePruner<'a>(pub &'a [String]);

impl IgnorePruner<'_> {
    pub fn prune(&self, tree: &mut DiffNode) {
        if self.0.is_empty() {
            return;
        }
        walk_mut(tree, ContainerKind::None, &mut |node, _| {
            if path_matches(self.0, &node.path) {
                node.kind = DiffKind::Ignored;
            }
        });
    }
}

/// Ignores `Missing` nodes whose path matches one of the configured
/// suffixes. Other kinds at the same path still report.
pub struct IgnoreMissingPruner<'a>(pub &'a [String]);

impl IgnoreMissingPruner<'_> {
    pub fn prune(&self, tree: &mut DiffNode) {
        if self.0.is_empty() {
            return;
        }
        walk_mut(tree, ContainerKind::None, &mut |node, _| {
            if node.kind == DiffKind::Missing && path_matches(self.0, &node.path) {
                node.kind = DiffKind::Ignored;
            }
        });
    }
}

/// Default noise-reduction policy, applied unconditionally after the rule
/// pruners:
///
/// - scalar content differences are tolerated (only structural and type
///   problems report by default);
/// - `Excess` nodes are tolerated (new target-side fields are not
///   regressions);
/// - with `ignore_null`, any node touching a literal null is tolerated;
/// - a `Missing` element of a sequence is tolerated (array shrinkage is
///   not itself an error).
pub fn prune(tree: &mut DiffNode, ignore_null: bool) {
    walk_mut(tree, ContainerKind::None, &mut |node, parent| {
        let ignore = (node.is_leaf() && node.kind == DiffKind::ContentDiffer)
            || node.kind == DiffKind::Excess
            || (ignore_null && node.touches_null())
            || (parent == ContainerKind::Sequence && node.kind == DiffKind::Missing);
        if ignore {
            node.kind = DiffKind::Ignored;
        }
    });
}
