use recipe_depgraph::utils::{project_root, table};
use std::fs;
use tempfile::tempdir;

#[test]
fn table_renderer_produces_expected_grid() {
    let headers = ["A", "B"];
    let rows = vec![vec!["x".into(), "y".into()], vec!["long".into()]];
    let out = table::render(&headers, &rows);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "+------+---+");
    assert_eq!(lines[1], "| A    | B |");
    assert_eq!(lines[3], "| x    | y |");
    assert_eq!(lines[4], "| long |   |");
    assert_eq!(lines.len(), 6);
}

#[test]
fn project_root_detects_nearest_manifest_ancestor() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("recipes.toml"), "[package]\nname = \"build\"\n").unwrap();
    let nested = root.join("recipes/steps");
    fs::create_dir_all(&nested).unwrap();

    assert_eq!(project_root::detect(Some(&nested)), root.to_path_buf());
    assert_eq!(project_root::effective_path_opt(Some(&nested)), nested);
}
