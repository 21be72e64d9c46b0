//! Tree assembly
//!
//! Nodes are stored flat with a `parent_id`; the nested view is rebuilt on
//! every read. Assembly is iterative (explicit stack, no recursion) and
//! visits each node at most once, so corrupted parent chains cannot loop.

use shared::models::{NodeCounts, TaxonomyNode, TaxonomyTreeNode};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Sibling order: lower-cased name by code point, then name, then id
pub fn compare_nodes(a: &TaxonomyNode, b: &TaxonomyNode) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Per-node dependent counts, keyed by node id
#[derive(Debug, Clone, Default)]
pub struct CountIndex {
    pub children: HashMap<i64, i64>,
    pub products: HashMap<i64, i64>,
}

impl CountIndex {
    pub fn get(&self, id: i64) -> NodeCounts {
        NodeCounts {
            products: self.products.get(&id).copied().unwrap_or(0),
            children: self.children.get(&id).copied().unwrap_or(0),
        }
    }
}

/// Assemble the forest of root nodes
///
/// `max_depth` counts levels including the roots: with `Some(2)` roots carry
/// their direct children and those children have empty `children` lists.
/// `None` expands the whole tree. Nodes not reachable from a root (only
/// possible with a corrupted parent chain) are left out and logged.
pub fn assemble_forest(
    mut nodes: Vec<TaxonomyNode>,
    counts: &CountIndex,
    max_depth: Option<usize>,
) -> Vec<TaxonomyTreeNode> {
    let total = nodes.len();
    nodes.sort_by(compare_nodes);

    let mut roots = Vec::new();
    let mut children_of: HashMap<i64, Vec<i64>> = HashMap::new();
    for node in &nodes {
        match node.parent_id {
            None => roots.push(node.id),
            Some(parent_id) => children_of.entry(parent_id).or_default().push(node.id),
        }
    }
    let mut by_id: HashMap<i64, TaxonomyNode> = nodes.into_iter().map(|n| (n.id, n)).collect();

    // Pre-order walk: parents are recorded before their children
    let mut order: Vec<(i64, bool)> = Vec::with_capacity(total);
    let mut visited = HashSet::with_capacity(total);
    let mut stack: Vec<(i64, usize)> = roots.iter().rev().map(|&id| (id, 1)).collect();
    let mut depth_limited = 0usize;

    while let Some((id, depth)) = stack.pop() {
        if !visited.insert(id) {
            tracing::warn!(node_id = id, "Taxonomy node reached twice, skipping");
            continue;
        }
        let expand = max_depth.is_none_or(|max| depth < max);
        if expand {
            if let Some(children) = children_of.get(&id) {
                stack.extend(children.iter().rev().map(|&child| (child, depth + 1)));
            }
        } else {
            depth_limited += children_of.get(&id).map_or(0, Vec::len);
        }
        order.push((id, expand));
    }

    if max_depth.is_none() && visited.len() < total {
        tracing::warn!(
            unreachable = total - visited.len(),
            "Taxonomy nodes not reachable from any root"
        );
    } else if depth_limited > 0 {
        tracing::debug!(depth_limited, "Taxonomy nodes beyond the depth limit not expanded");
    }

    // Build bottom-up so every child is finished before its parent takes it
    let mut built: HashMap<i64, TaxonomyTreeNode> = HashMap::with_capacity(order.len());
    for (id, expand) in order.into_iter().rev() {
        let Some(node) = by_id.remove(&id) else {
            continue;
        };
        let children = if expand {
            children_of
                .get(&id)
                .map(|ids| ids.iter().filter_map(|cid| built.remove(cid)).collect())
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        built.insert(
            id,
            TaxonomyTreeNode {
                count: counts.get(id),
                node,
                children,
            },
        );
    }

    roots.iter().filter_map(|id| built.remove(id)).collect()
}

/// Wrap nodes as leaf tree entries, sorted, without expanding children
pub fn leaves(mut nodes: Vec<TaxonomyNode>, counts: &CountIndex) -> Vec<TaxonomyTreeNode> {
    nodes.sort_by(compare_nodes);
    nodes
        .into_iter()
        .map(|node| TaxonomyTreeNode {
            count: counts.get(node.id),
            node,
            children: Vec::new(),
        })
        .collect()
}
