pub mod table {
    // Helper to render a separator line
    fn sep(widths: &[usize]) -> String {
        let mut s = String::from("+");
        for w in widths {
            s.push_str(&"-".repeat(w + 2));
            s.push('+');
        }
        s
    }

    fn line(cells: &[String], widths: &[usize]) -> String {
        let mut s = String::from("|");
        for (cell, w) in cells.iter().zip(widths) {
            s.push(' ');
            s.push_str(cell);
            s.push_str(&" ".repeat(w.saturating_sub(cell.len())));
            s.push_str(" |");
        }
        s
    }

    /// Render a simple ASCII table given headers and rows. Missing cells render empty.
    #[must_use]
    pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
        let cols = headers.len();
        let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
        for row in rows {
            for (c, w) in widths.iter_mut().enumerate() {
                *w = (*w).max(row.get(c).map_or(0, String::len));
            }
        }

        let mut out = String::new();
        out.push_str(&sep(&widths));
        out.push('\n');
        let header_cells: Vec<String> = headers.iter().map(|s| (*s).to_string()).collect();
        out.push_str(&line(&header_cells, &widths));
        out.push('\n');
        out.push_str(&sep(&widths));
        out.push('\n');
        for row in rows {
            let cells: Vec<String> = (0..cols).map(|i| row.get(i).cloned().unwrap_or_default()).collect();
            out.push_str(&line(&cells, &widths));
            out.push('\n');
        }
        out.push_str(&sep(&widths));
        out
    }
}

pub mod config {
    use crate::errors::DepGraphError;
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tracing::warn;

    pub const CONFIG_FILE_NAME: &str = "recipe-depgraph.toml";

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct DepgraphConfig {
        pub ignore_packages: Option<Vec<String>>,
        pub recipe_filter: Option<String>,
        pub output: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct QueryConfig {
        pub default_format: Option<String>, // "text" | "json"
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct Config {
        /// Owning package used for recipe lookups.
        pub package: Option<String>,
        pub depgraph: Option<DepgraphConfig>,
        pub query: Option<QueryConfig>,
    }

    fn default_config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }

    /// Read a config file the user named explicitly.
    ///
    /// # Errors
    /// Fails when the file cannot be read or is not valid config TOML.
    pub fn read_config(path: &Path) -> Result<Config, DepGraphError> {
        let data = fs::read_to_string(path)
            .map_err(|source| DepGraphError::ConfigRead { file: path.to_path_buf(), source })?;
        toml::from_str::<Config>(&data)
            .map_err(|source| DepGraphError::Config { file: path.to_path_buf(), source })
    }

    /// Load a config file. Unreadable or malformed files yield `None`.
    #[must_use]
    pub fn load_config_at(path: &Path) -> Option<Config> {
        match read_config(path) {
            Ok(cfg) => Some(cfg),
            Err(DepGraphError::ConfigRead { .. }) => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config");
                None
            }
        }
    }

    #[must_use]
    pub fn load_config_near(root: &Path) -> Option<Config> {
        let p = default_config_path(root);
        if p.exists() {
            load_config_at(&p)
        } else {
            None
        }
    }
}

pub mod project_root {
    use crate::registry::manifest::MANIFEST_FILE_NAME;
    use std::env;
    use std::path::{Path, PathBuf};

    /// Walk ancestors of `start` (or the current directory) looking for a `recipes.toml`.
    #[must_use]
    pub fn detect(start: Option<&Path>) -> PathBuf {
        let fallback = || env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut cur = start.map_or_else(fallback, Path::to_path_buf);
        loop {
            if cur.join(MANIFEST_FILE_NAME).is_file() {
                return cur;
            }
            match cur.parent() {
                Some(parent) => cur = parent.to_path_buf(),
                None => return fallback(),
            }
        }
    }

    /// None or "." resolve to the detected package root; any other path is returned as-is.
    #[must_use]
    pub fn effective_path_opt(p: Option<&Path>) -> PathBuf {
        match p {
            None => detect(None),
            Some(path) if path == Path::new(".") => detect(None),
            Some(path) => path.to_path_buf(),
        }
    }
}
