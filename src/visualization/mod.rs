use crate::errors::DepGraphError;
use crate::graph::{DepGraph, NodeId};
use crate::registry::PackageId;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::io::Write;
use tracing::{debug, info};

/// Strict mode collapses duplicate edges; `concentrate` bundles parallel ones.
pub const GRAPH_HEADER: &str = "strict digraph {\n  concentrate = true;\n  ranksep = 2;\n  nodesep = 0.25;\n";
pub const GRAPH_FOOTER: &str = "}\n";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub edges: usize,
    pub skipped_edges: usize,
    pub clusters: usize,
    pub recipes: usize,
}

/// Writes a [`DepGraph`] as Graphviz DOT.
///
/// Node names are emitted verbatim and must already be valid inside a
/// quoted DOT identifier; nothing is escaped.
#[derive(Debug, Default)]
pub struct DotRenderer;

impl DotRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {}
    }

    /// Render `graph` into `out`.
    ///
    /// Edges whose source or target belongs to a package in `ignore` are
    /// dropped, as are the clusters of ignored packages. The recipe cluster
    /// is only emitted when `filter_active` and some non-ignored recipe is
    /// left in the graph. Nothing is written if the graph is inconsistent.
    ///
    /// # Errors
    /// Returns `DepGraphError::UnknownModule` if an edge targets a module with
    /// no owner, and `DepGraphError::Io` if writing to `out` fails.
    pub fn render<W: Write>(
        &self,
        graph: &DepGraph,
        ignore: &BTreeSet<PackageId>,
        filter_active: bool,
        out: &mut W,
    ) -> Result<RenderStats, DepGraphError> {
        let (text, stats) = self.render_string(graph, ignore, filter_active)?;
        out.write_all(text.as_bytes())?;
        out.flush()?;
        info!(
            edges = stats.edges,
            skipped = stats.skipped_edges,
            clusters = stats.clusters,
            recipes = stats.recipes,
            "rendered dependency graph"
        );
        Ok(stats)
    }

    /// Render `graph` to an in-memory string. See [`DotRenderer::render`].
    ///
    /// # Errors
    /// Returns `DepGraphError::UnknownModule` if the graph is inconsistent.
    pub fn render_string(
        &self,
        graph: &DepGraph,
        ignore: &BTreeSet<PackageId>,
        filter_active: bool,
    ) -> Result<(String, RenderStats), DepGraphError> {
        let mut stats = RenderStats::default();
        let mut s = String::from(GRAPH_HEADER);

        for (node, deps) in &graph.edges {
            let source_owner = graph.owner_of(node).ok_or_else(|| match node {
                NodeId::Module(n) => DepGraphError::UnknownModule {
                    module: n.clone(),
                    referenced_by: "the graph".to_string(),
                },
                NodeId::Recipe(n) => DepGraphError::UnknownRecipe { recipe: n.clone() },
            })?;
            for dep in deps {
                let target_owner = graph.module_owner.get(dep).ok_or_else(|| {
                    DepGraphError::UnknownModule { module: dep.clone(), referenced_by: format!("'{node}'") }
                })?;
                if ignore.contains(source_owner) || ignore.contains(target_owner) {
                    debug!(from = %node, to = %dep, "skipping edge into ignored package");
                    stats.skipped_edges += 1;
                    continue;
                }
                let _ = writeln!(s, "  \"{node}\" -> \"{dep}\"");
                stats.edges += 1;
            }
        }

        let mut packages: BTreeMap<&PackageId, Vec<&str>> = BTreeMap::new();
        for (module, package) in &graph.module_owner {
            packages.entry(package).or_default().push(module);
        }
        for (package, modules) in packages {
            if ignore.contains(package) {
                continue;
            }
            // "cluster_" makes graphviz draw a box around the subgraph.
            let _ = writeln!(
                s,
                "  subgraph \"cluster_package_{package}\" {{ label=\"{package}\"; {}; }}",
                modules.join("; ")
            );
            stats.clusters += 1;
        }

        if filter_active {
            let recipes: Vec<String> = graph
                .recipe_owner
                .iter()
                .filter(|(_, owner)| !ignore.contains(*owner))
                .map(|(name, _)| format!("\"{}\"", NodeId::Recipe(name.clone())))
                .collect();
            if !recipes.is_empty() {
                let _ = writeln!(
                    s,
                    "  subgraph \"cluster_recipes\" {{ label=\"recipes\"; {}; }}",
                    recipes.join("; ")
                );
                stats.recipes = recipes.len();
            }
        }

        s.push_str(GRAPH_FOOTER);
        Ok((s, stats))
    }
}
