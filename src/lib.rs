//! recipe-depgraph — recipe dependency graphs for Graphviz
//!
//! Collect recipe modules and recipes from a set of packages and render
//! their dependencies as DOT text for `dot`/`tred`.
//!
//! # Features
//! - Package discovery from `recipes.toml` manifests with `.gitignore`/`.ignore` support
//! - Modules and recipes as distinct node kinds, even when names collide
//! - Recipe filter: narrow the graph to the closure of recipes matching a substring
//! - Package exclusion applied uniformly to edges and clusters
//! - Reverse-dependency (`refs`) queries, direct or transitive
//! - Deterministic output ordering
//!
//! # Quickstart (Library)
//! ```
//! use recipe_depgraph::graph::{generate, DepgraphOptions};
//! use recipe_depgraph::registry::{PackageManifest, Universe};
//!
//! let universe = Universe::from_packages([
//!     PackageManifest::new("engine").module("step", &[]),
//!     PackageManifest::new("build").module("git", &["step"]).recipe("ci", &["git"]),
//! ])
//! .expect("consistent packages");
//! let opts = DepgraphOptions { recipe_filter: "ci".into(), ..Default::default() };
//! let mut out = Vec::new();
//! generate(&universe, Some(&"build".into()), &opts, &mut out).expect("render graph");
//! let dot = String::from_utf8(out).unwrap();
//! assert!(dot.contains("\"recipe ci\" -> \"git\""));
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! recipe-depgraph depgraph --ignore-package engine | tred | dot -Tpdf > graph.pdf
//! recipe-depgraph depgraph --recipe-filter ci_ --output ci.dot
//! recipe-depgraph refs git --transitive --format json
//! ```
pub mod app;
pub mod cli;
pub mod errors;
pub mod graph;
pub mod query;
pub mod registry;
pub mod utils;
pub mod visualization;
