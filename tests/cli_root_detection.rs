use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn root_and_own_package_detected_without_flags() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(
        root.join("recipes.toml"),
        "[package]\nname = \"build\"\n[modules.git]\n[recipes.ci_main]\ndeps = [\"git\"]\n",
    )
    .unwrap();
    let nested = root.join("recipes");
    fs::create_dir_all(&nested).unwrap();

    // Run from a subdirectory: the ancestor manifest defines both root and owning package
    let mut cmd = Command::cargo_bin("recipe-depgraph").unwrap();
    cmd.env_remove("RECIPE_DEPGRAPH_PACKAGE")
        .current_dir(&nested)
        .arg("depgraph")
        .arg("--recipe-filter")
        .arg("ci");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"recipe ci_main\" -> \"git\""))
        .stdout(predicate::str::contains("subgraph \"cluster_package_build\" { label=\"build\"; git; }"));
}

#[test]
fn verbose_logs_go_to_stderr() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("recipes.toml"), "[package]\nname = \"build\"\n[modules.git]\n").unwrap();

    let mut cmd = Command::cargo_bin("recipe-depgraph").unwrap();
    cmd.env_remove("RECIPE_DEPGRAPH_LOG")
        .current_dir(root)
        .arg("-v")
        .arg("depgraph");
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("strict digraph {"))
        .stderr(predicate::str::contains("loaded packages"));
}
