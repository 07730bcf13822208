use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "recipe-depgraph",
    version,
    about = "Recipe dependency graph explorer",
    long_about = "Produce a graph of recipe and recipe module dependencies as Graphviz DOT. Packages are discovered from recipes.toml manifests under --root, honoring .gitignore and .ignore. Example: recipe-depgraph depgraph | tred | dot -Tpdf > graph.pdf"
)]
pub struct Cli {
    /// Suppress non-essential output
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,
    /// Increase log verbosity (-v info, -vv debug); logs go to stderr
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Where packages come from and which one is ours.
#[derive(Debug, Clone, Default, Args)]
pub struct RegistryArgs {
    /// Directory scanned for recipes.toml manifests (default: nearest ancestor with one)
    #[arg(short, long)]
    pub root: Option<PathBuf>,
    /// Name of the owning package whose recipes are examined
    #[arg(long, env = "RECIPE_DEPGRAPH_PACKAGE")]
    pub package: Option<String>,
    /// Path to a TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Produce a DOT graph of recipe and recipe module dependencies
    Depgraph {
        #[command(flatten)]
        registry: RegistryArgs,
        /// The file to write output to (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Ignore a recipe package. Can be passed multiple times
        #[arg(long = "ignore-package", value_name = "PACKAGE")]
        ignore_package: Vec<String>,
        /// A recipe substring to examine. If present, the graph includes a recipe
        /// section with the matching recipes and only the modules they reach
        #[arg(long, value_name = "SUBSTRING")]
        recipe_filter: Option<String>,
    },
    /// List modules and recipes depending on the given module(s)
    Refs {
        /// Module(s) to query for
        #[arg(required = true, value_name = "MODULE")]
        modules: Vec<String>,
        /// Include transitive references
        #[arg(long, default_value_t = false)]
        transitive: bool,
        #[command(flatten)]
        registry: RegistryArgs,
        /// Output format (default: text, or the configured default)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ignore_package_is_repeatable() {
        let cli = Cli::try_parse_from([
            "recipe-depgraph",
            "depgraph",
            "--ignore-package",
            "engine",
            "--ignore-package",
            "tools",
            "--recipe-filter",
            "ci_",
        ])
        .unwrap();
        match cli.command {
            Commands::Depgraph { ignore_package, recipe_filter, output, .. } => {
                assert_eq!(ignore_package, vec!["engine".to_string(), "tools".to_string()]);
                assert_eq!(recipe_filter.as_deref(), Some("ci_"));
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn refs_requires_a_module() {
        assert!(Cli::try_parse_from(["recipe-depgraph", "refs"]).is_err());
    }
}
