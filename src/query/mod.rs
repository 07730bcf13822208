use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::errors::DepGraphError;
use crate::graph::{DepGraph, NodeId};

/// Query trait implemented by all query types.
///
/// Given an immutable reference to a `DepGraph`, returns a result of type `R`.
pub trait Query<R> {
    fn run(&self, graph: &DepGraph) -> R;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Module,
    Recipe,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefRow {
    pub kind: NodeKind,
    pub name: String,
    /// Owning package, absent for recipes that were not collected with an owner.
    pub package: Option<String>,
}

/// Find the modules and recipes that depend on any of `modules`.
///
/// With `transitive`, referrers of referrers are followed until nothing new
/// turns up. Recipes are never depended upon, so they end a chain.
pub struct RefsQuery {
    pub modules: Vec<String>,
    pub transitive: bool,
}

impl RefsQuery {
    #[must_use]
    pub fn new<S: AsRef<str>>(modules: &[S], transitive: bool) -> Self {
        Self { modules: modules.iter().map(|m| m.as_ref().to_string()).collect(), transitive }
    }
}

impl Query<Result<Vec<RefRow>, DepGraphError>> for RefsQuery {
    fn run(&self, graph: &DepGraph) -> Result<Vec<RefRow>, DepGraphError> {
        if self.modules.is_empty() {
            return Err(DepGraphError::Query("at least one module is required".to_string()));
        }
        if let Some(unknown) = self.modules.iter().find(|m| !graph.module_owner.contains_key(*m)) {
            return Err(DepGraphError::UnknownModule {
                module: unknown.clone(),
                referenced_by: "the query".to_string(),
            });
        }

        // module name -> nodes that list it as a dependency
        let mut reverse: BTreeMap<&str, BTreeSet<&NodeId>> = BTreeMap::new();
        for (node, deps) in &graph.edges {
            for dep in deps {
                reverse.entry(dep.as_str()).or_default().insert(node);
            }
        }

        let targets: BTreeSet<&str> = self.modules.iter().map(String::as_str).collect();
        let mut found: BTreeSet<&NodeId> = BTreeSet::new();
        let mut stack: Vec<&str> = targets.iter().copied().collect();
        let mut seen: BTreeSet<&str> = targets.clone();
        while let Some(module) = stack.pop() {
            let Some(referrers) = reverse.get(module) else { continue };
            for &node in referrers {
                if let NodeId::Module(name) = node {
                    if targets.contains(name.as_str()) {
                        continue;
                    }
                    if self.transitive && seen.insert(name.as_str()) {
                        stack.push(name.as_str());
                    }
                }
                found.insert(node);
            }
        }

        Ok(found
            .into_iter()
            .map(|node| RefRow {
                kind: if node.is_recipe() { NodeKind::Recipe } else { NodeKind::Module },
                name: node.name().to_string(),
                package: graph.owner_of(node).map(ToString::to_string),
            })
            .collect())
    }
}
