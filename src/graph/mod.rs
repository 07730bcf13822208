//! Dependency graph model and builder.
//!
//! A [`DepGraph`] maps each node ([`NodeId`]) to the names of the modules it
//! depends on, alongside the owning package of every module and of every
//! collected recipe. Graphs are built fresh from a [`Registry`] snapshot,
//! optionally narrowed with [`DepGraph::retain_reachable_from_recipes`], and
//! handed to [`crate::visualization::DotRenderer`].
use crate::errors::DepGraphError;
use crate::registry::{PackageId, Registry};
use crate::visualization::{DotRenderer, RenderStats};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::Write;
use tracing::{debug, warn};

pub mod reachability;

/// Identity of a graph node.
///
/// Modules and recipes live in separate namespaces: `Module("x")` and
/// `Recipe("x")` are different nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Module(String),
    Recipe(String),
}

impl NodeId {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            NodeId::Module(n) | NodeId::Recipe(n) => n,
        }
    }

    #[must_use]
    pub fn is_recipe(&self) -> bool {
        matches!(self, NodeId::Recipe(_))
    }
}

/// Renders the DOT label: bare name for modules, `recipe <name>` for recipes.
impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Module(n) => f.write_str(n),
            NodeId::Recipe(n) => write!(f, "recipe {n}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepGraph {
    /// Node -> names of the modules it depends on, in declaration order.
    pub edges: BTreeMap<NodeId, Vec<String>>,
    pub module_owner: BTreeMap<String, PackageId>,
    /// Only recipes that were collected (matched the filter) have an entry.
    pub recipe_owner: BTreeMap<String, PackageId>,
}

impl DepGraph {
    #[must_use]
    pub fn has_recipes(&self) -> bool {
        !self.recipe_owner.is_empty()
    }

    pub fn recipes(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().filter(|n| n.is_recipe()).map(NodeId::name)
    }

    /// Owning package of `node`, if known.
    #[must_use]
    pub fn owner_of(&self, node: &NodeId) -> Option<&PackageId> {
        match node {
            NodeId::Module(n) => self.module_owner.get(n),
            NodeId::Recipe(n) => self.recipe_owner.get(n),
        }
    }
}

pub struct GraphBuilder;

impl GraphBuilder {
    /// Collect every module, plus the recipes of `own_package` whose name
    /// contains `recipe_filter`. An empty filter collects no recipes at all.
    ///
    /// Modules of every package are collected, ignored or not; exclusion is
    /// applied when rendering.
    ///
    /// # Errors
    /// Returns `DepGraphError::MissingOwnPackage` if a non-empty filter is
    /// given without an owning package, and propagates registry failures.
    pub fn build<R: Registry + ?Sized>(
        registry: &R,
        own_package: Option<&PackageId>,
        recipe_filter: &str,
    ) -> Result<DepGraph, DepGraphError> {
        if recipe_filter.is_empty() {
            return Self::collect(registry, None, "");
        }
        let own = own_package.ok_or(DepGraphError::MissingOwnPackage)?;
        Self::collect(registry, Some(own), recipe_filter)
    }

    /// Collect every module and every recipe visible from `own_package`.
    ///
    /// # Errors
    /// Propagates registry failures.
    pub fn build_all<R: Registry + ?Sized>(
        registry: &R,
        own_package: Option<&PackageId>,
    ) -> Result<DepGraph, DepGraphError> {
        Self::collect(registry, own_package, "")
    }

    fn collect<R: Registry + ?Sized>(
        registry: &R,
        own_package: Option<&PackageId>,
        recipe_filter: &str,
    ) -> Result<DepGraph, DepGraphError> {
        let mut graph = DepGraph::default();
        for (package, module_name) in registry.modules() {
            let module = registry.resolve_module(&package, &module_name)?;
            graph.module_owner.insert(module.name.clone(), package);
            graph.edges.insert(NodeId::Module(module.name), module.deps);
        }

        if let Some(own) = own_package {
            let view = registry.scope_to_package(own)?;
            for recipe_name in view.recipes() {
                if !recipe_name.contains(recipe_filter) {
                    continue;
                }
                let recipe = view.resolve_recipe(&recipe_name)?;
                graph.recipe_owner.insert(recipe.name.clone(), own.clone());
                graph.edges.insert(NodeId::Recipe(recipe.name), recipe.deps);
            }
        }

        debug!(
            modules = graph.module_owner.len(),
            recipes = graph.recipe_owner.len(),
            filter = recipe_filter,
            "collected dependency graph"
        );
        Ok(graph)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DepgraphOptions {
    pub ignore: BTreeSet<PackageId>,
    /// Substring selecting recipes of the owning package; empty disables
    /// the recipe section entirely.
    pub recipe_filter: String,
}

/// Build, narrow, and render the dependency graph of `registry` into `out`.
///
/// A non-empty filter that matches no recipe falls back to the full module
/// graph, producing the same output as an empty filter.
///
/// # Errors
/// Returns registry errors, `DepGraphError::UnknownModule` for dependencies
/// on undeclared modules, and `DepGraphError::Io` if writing `out` fails.
pub fn generate<R: Registry + ?Sized, W: Write>(
    registry: &R,
    own_package: Option<&PackageId>,
    opts: &DepgraphOptions,
    out: &mut W,
) -> Result<RenderStats, DepGraphError> {
    let mut graph = GraphBuilder::build(registry, own_package, &opts.recipe_filter)?;
    let filter_active = !opts.recipe_filter.is_empty();
    if filter_active {
        if graph.has_recipes() {
            graph.retain_reachable_from_recipes();
        } else {
            warn!(filter = %opts.recipe_filter, "recipe filter matched nothing; rendering full graph");
        }
    }
    DotRenderer::new().render(&graph, &opts.ignore, filter_active, out)
}
