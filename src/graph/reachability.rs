//! Closure of the nodes reachable from the collected recipes.
use super::{DepGraph, NodeId};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Every node reachable from the recipes in `edges`, recipes included.
///
/// Dependencies on modules missing from `edges` are kept as leaves so the
/// renderer can report them.
#[must_use]
pub fn recipe_closure(edges: &BTreeMap<NodeId, Vec<String>>) -> BTreeSet<NodeId> {
    let mut stack: Vec<NodeId> = edges.keys().filter(|n| n.is_recipe()).cloned().collect();
    let mut kept: BTreeSet<NodeId> = BTreeSet::new();
    while let Some(node) = stack.pop() {
        if kept.contains(&node) {
            continue;
        }
        if let Some(deps) = edges.get(&node) {
            for dep in deps {
                let next = NodeId::Module(dep.clone());
                if !kept.contains(&next) {
                    stack.push(next);
                }
            }
        }
        kept.insert(node);
    }
    kept
}

impl DepGraph {
    /// Prune the graph to the closure of its recipes.
    ///
    /// Only removes entries. Returns the number of nodes kept.
    pub fn retain_reachable_from_recipes(&mut self) -> usize {
        let kept = recipe_closure(&self.edges);
        let before = self.edges.len();
        self.edges.retain(|node, _| kept.contains(node));
        self.module_owner.retain(|name, _| kept.contains(&NodeId::Module(name.clone())));
        self.recipe_owner.retain(|name, _| kept.contains(&NodeId::Recipe(name.clone())));
        debug!(before, kept = self.edges.len(), "pruned graph to recipe closure");
        kept.len()
    }
}
