use recipe_depgraph::app::run_cli;
use recipe_depgraph::cli::{Cli, Commands, OutputFormat, RegistryArgs};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    fs::write(path, content).unwrap();
}

fn setup(root: &Path) {
    write_file(
        &root.join("recipes.toml"),
        "[package]\nname = \"build\"\n[modules.git]\ndeps = [\"step\"]\n[recipes.ci_main]\ndeps = [\"git\"]\n",
    );
    write_file(&root.join("engine/recipes.toml"), "[package]\nname = \"engine\"\n[modules.step]\n");
}

fn registry(root: &Path) -> RegistryArgs {
    RegistryArgs { root: Some(root.to_path_buf()), package: Some("build".into()), config: None }
}

#[test]
fn app_depgraph_writes_output_file() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    setup(root);
    let out = root.join("graph.dot");

    let cli = Cli {
        quiet: true,
        verbose: 0,
        command: Commands::Depgraph {
            registry: registry(root),
            output: Some(out.clone()),
            ignore_package: vec!["engine".into()],
            recipe_filter: Some("ci".into()),
        },
    };
    assert_eq!(run_cli(cli), 0);

    let dot = fs::read_to_string(&out).unwrap();
    assert!(dot.contains("  \"recipe ci_main\" -> \"git\"\n"));
    assert!(!dot.contains("step"));
    assert!(dot.contains("subgraph \"cluster_recipes\""));
}

#[test]
fn app_depgraph_unknown_own_package_fails_only_when_filtering() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    setup(root);
    let out = root.join("graph.dot");

    let mut args = registry(root);
    args.package = Some("missing".into());
    let unfiltered = Cli {
        quiet: true,
        verbose: 0,
        command: Commands::Depgraph {
            registry: args.clone(),
            output: Some(out.clone()),
            ignore_package: vec![],
            recipe_filter: None,
        },
    };
    assert_eq!(run_cli(unfiltered), 0);

    let filtered = Cli {
        quiet: true,
        verbose: 0,
        command: Commands::Depgraph {
            registry: args,
            output: Some(out),
            ignore_package: vec![],
            recipe_filter: Some("ci".into()),
        },
    };
    assert_eq!(run_cli(filtered), 1);
}

#[test]
fn app_depgraph_unwritable_output_fails() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    setup(root);

    let cli = Cli {
        quiet: true,
        verbose: 0,
        command: Commands::Depgraph {
            registry: registry(root),
            output: Some(root.join("no/such/dir/graph.dot")),
            ignore_package: vec![],
            recipe_filter: None,
        },
    };
    assert_eq!(run_cli(cli), 1);
}

#[test]
fn app_depgraph_fault_keeps_existing_output_file() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_file(
        &root.join("recipes.toml"),
        "[package]\nname = \"build\"\n[modules.git]\ndeps = [\"ghost\"]\n",
    );
    let out = root.join("graph.dot");
    let previous = "strict digraph { previous good graph }\n";
    write_file(&out, previous);

    let cli = Cli {
        quiet: true,
        verbose: 0,
        command: Commands::Depgraph {
            registry: registry(root),
            output: Some(out.clone()),
            ignore_package: vec![],
            recipe_filter: None,
        },
    };
    assert_eq!(run_cli(cli), 1);
    assert_eq!(fs::read_to_string(&out).unwrap(), previous);
}

#[test]
fn app_explicit_config_must_load() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    setup(root);
    let bad = root.join("bad.toml");
    write_file(&bad, "package = [\n");

    let run = |config: std::path::PathBuf| {
        let mut args = registry(root);
        args.config = Some(config);
        run_cli(Cli {
            quiet: true,
            verbose: 0,
            command: Commands::Depgraph {
                registry: args,
                output: Some(root.join("graph.dot")),
                ignore_package: vec![],
                recipe_filter: None,
            },
        })
    };
    assert_eq!(run(bad), 1);
    assert_eq!(run(root.join("missing.toml")), 1);
    assert!(!root.join("graph.dot").exists());

    let good = root.join("good.toml");
    write_file(&good, "[depgraph]\nignore_packages = [\"engine\"]\n");
    assert_eq!(run(good), 0);
    assert!(!fs::read_to_string(root.join("graph.dot")).unwrap().contains("step"));
}

#[test]
fn app_refs_json_and_unknown_module() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    setup(root);

    let ok = Cli {
        quiet: false,
        verbose: 0,
        command: Commands::Refs {
            modules: vec!["step".into()],
            transitive: true,
            registry: registry(root),
            format: Some(OutputFormat::Json),
        },
    };
    assert_eq!(run_cli(ok), 0);

    let unknown = Cli {
        quiet: false,
        verbose: 0,
        command: Commands::Refs {
            modules: vec!["nope".into()],
            transitive: false,
            registry: registry(root),
            format: None,
        },
    };
    assert_eq!(run_cli(unknown), 1);
}
