//! Target resolver
//!
//! Post-pass over all edges. A target splits on `.` into an origin and a
//! path:
//! - `""` (as in `.a`) → the source state itself
//! - `#id`            → the state registered under `id`
//! - anything else    → a sibling: child of the source's parent
//!
//! The path is then walked through the lexical tree. Failures are recorded
//! per target and never stop resolution of the others.

use tracing::warn;

use crate::features::machine_extraction::domain::{
    EdgeId, ExtractionErrorKind, LexicalIndex, LexicalTree, NodeId,
};
use crate::features::machine_extraction::ports::ExtractionContext;

/// Resolve one target string from `source`
pub fn resolve_target(
    tree: &LexicalTree,
    explicit_id: impl Fn(&str) -> Option<LexicalIndex>,
    source: LexicalIndex,
    target: &str,
) -> Option<LexicalIndex> {
    let mut segments = target.split('.');
    let origin = segments.next().unwrap_or("");

    let mut current = if origin.is_empty() {
        source
    } else if let Some(id) = origin.strip_prefix('#') {
        explicit_id(id)?
    } else {
        tree.child(tree.parent(source)?, origin)?
    };

    for segment in segments {
        current = tree.child(current, segment)?;
    }
    Some(current)
}

/// Fill `resolved_targets` of every edge
pub fn resolve_targets(ctx: &mut ExtractionContext<'_>) {
    let pending: Vec<(EdgeId, NodeId, Vec<String>)> = ctx
        .digraph
        .edges
        .values()
        .filter(|e| !e.targets.is_empty())
        .map(|e| (e.id.clone(), e.source.clone(), e.targets.clone()))
        .collect();

    for (edge_id, source, targets) in pending {
        let Some(source_index) = ctx.lexical_index(&source) else {
            continue;
        };

        let mut resolved = Vec::with_capacity(targets.len());
        for target in targets {
            let found = resolve_target(&ctx.lexical_tree, |id| ctx.explicit_id(id), source_index, &target)
                .and_then(|index| ctx.lexical_tree.id(index))
                .map(str::to_string);
            match found {
                Some(node_id) => resolved.push(node_id),
                None => {
                    warn!(edge = %edge_id, target = %target, "unresolved transition target");
                    let at = ctx
                        .locations
                        .edge(&edge_id)
                        .and_then(|loc| loc.transition.resolve(ctx.call, ctx.file.root()));
                    ctx.error(
                        ExtractionErrorKind::TransitionTargetUnresolved {
                            edge_id: edge_id.clone(),
                            target,
                        },
                        at.as_ref(),
                    );
                }
            }
        }

        if let Some(edge) = ctx.digraph.edges.get_mut(&edge_id) {
            edge.resolved_targets = resolved;
        }
    }
}
