use crate::cli::{Cli, Commands, OutputFormat, RegistryArgs};
use crate::errors::DepGraphError;
use crate::graph::{generate, DepgraphOptions, GraphBuilder};
use crate::query::{NodeKind, Query, RefsQuery};
use crate::registry::{manifest, PackageId, Universe};
use crate::utils::config::{self, Config};
use crate::utils::{project_root, table};
use clap::CommandFactory;
use clap_complete::generate as generate_completions;
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Packages discovered for one invocation, with the owning package and config.
struct Workspace {
    universe: Universe,
    own_package: Option<PackageId>,
    config: Config,
}

fn load_workspace(args: &RegistryArgs) -> Result<Workspace, DepGraphError> {
    let root = project_root::effective_path_opt(args.root.as_deref());
    let config = match args.config.as_deref() {
        Some(path) => config::read_config(path)?,
        None => config::load_config_near(&root).unwrap_or_default(),
    };
    let universe = manifest::discover(&root)?;
    let own_package = match args.package.clone().or_else(|| config.package.clone()) {
        Some(name) => Some(PackageId::new(name)),
        None => manifest::package_at(&root)?,
    };
    info!(
        root = %root.display(),
        packages = universe.packages().count(),
        own_package = own_package.as_ref().map_or("<none>", PackageId::as_str),
        "loaded packages"
    );
    Ok(Workspace { universe, own_package, config })
}

fn exit_code(err: &DepGraphError) -> i32 {
    match err {
        DepGraphError::MissingOwnPackage => 2,
        _ => 1,
    }
}

fn write_depgraph(ws: &Workspace, opts: &DepgraphOptions, output: Option<&Path>) -> Result<(), DepGraphError> {
    let own = ws.own_package.as_ref();
    match output {
        Some(path) => {
            // Render fully before touching the destination so a fault leaves it intact
            let mut buf = Vec::new();
            generate(&ws.universe, own, opts, &mut buf)?;
            fs::write(path, buf)?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            generate(&ws.universe, own, opts, &mut out)?;
        }
    }
    Ok(())
}

/// Run the CLI logic in-process.
///
/// Returns an exit code: 0 on success, 1 on registry, consistency or I/O
/// failures, 2 when no owning package can be determined.
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = crate::cli::Cli::command();
            let bin_name = env!("CARGO_PKG_NAME");
            let mut out = io::stdout();
            generate_completions(shell, &mut cmd, bin_name, &mut out);
            0
        }
        Commands::Depgraph { registry, output, ignore_package, recipe_filter } => {
            let ws = match load_workspace(&registry) {
                Ok(ws) => ws,
                Err(e) => {
                    eprintln!("Failed to load packages: {e}");
                    return exit_code(&e);
                }
            };
            let cfg = ws.config.depgraph.clone().unwrap_or_default();
            let mut ignore: BTreeSet<PackageId> =
                ignore_package.into_iter().map(PackageId::new).collect();
            ignore.extend(cfg.ignore_packages.unwrap_or_default().into_iter().map(PackageId::new));
            for pkg in &ignore {
                if ws.universe.package(pkg).is_none() {
                    warn!(package = %pkg, "ignored package is not known");
                }
            }
            let opts = DepgraphOptions {
                ignore,
                recipe_filter: recipe_filter.or(cfg.recipe_filter).unwrap_or_default(),
            };
            let output: Option<PathBuf> = output.or_else(|| cfg.output.map(PathBuf::from));

            if let Err(e) = write_depgraph(&ws, &opts, output.as_deref()) {
                eprintln!("Depgraph failed: {e}");
                return exit_code(&e);
            }
            if let Some(path) = output {
                if !cli.quiet {
                    println!("Wrote dependency graph to {}", path.display());
                }
            }
            0
        }
        Commands::Refs { modules, transitive, registry, format } => {
            let ws = match load_workspace(&registry) {
                Ok(ws) => ws,
                Err(e) => {
                    eprintln!("Failed to load packages: {e}");
                    return exit_code(&e);
                }
            };
            let graph = match GraphBuilder::build_all(&ws.universe, ws.own_package.as_ref()) {
                Ok(g) => g,
                Err(e) => {
                    eprintln!("Build failed: {e}");
                    return exit_code(&e);
                }
            };
            let rows = match RefsQuery::new(&modules, transitive).run(&graph) {
                Ok(rows) => rows,
                Err(e) => {
                    eprintln!("Refs query failed: {e}");
                    return exit_code(&e);
                }
            };
            let fmt = format.unwrap_or_else(|| {
                match ws.config.query.as_ref().and_then(|q| q.default_format.as_deref()) {
                    Some("json") => OutputFormat::Json,
                    _ => OutputFormat::Text,
                }
            });
            if matches!(fmt, OutputFormat::Json) {
                match serde_json::to_string_pretty(&rows) {
                    Ok(s) => println!("{s}"),
                    Err(e) => {
                        eprintln!("JSON encode error: {e}");
                        return 1;
                    }
                }
            } else if rows.is_empty() {
                println!("<no references found>");
            } else {
                let body: Vec<Vec<String>> = rows
                    .into_iter()
                    .enumerate()
                    .map(|(i, r)| {
                        let kind = match r.kind {
                            NodeKind::Module => "module",
                            NodeKind::Recipe => "recipe",
                        };
                        vec![(i + 1).to_string(), kind.to_string(), r.name, r.package.unwrap_or_default()]
                    })
                    .collect();
                println!("{}", table::render(&["#", "Kind", "Name", "Package"], &body));
            }
            0
        }
    }
}
