use std::path::PathBuf;
use thiserror::Error;

use crate::registry::PackageId;

#[derive(Debug, Error)]
pub enum DepGraphError {
    #[error("Module '{module}' referenced by {referenced_by} has no known owning package")]
    UnknownModule { module: String, referenced_by: String },

    #[error("Recipe '{recipe}' is not declared")]
    UnknownRecipe { recipe: String },

    #[error("Unknown package '{0}'")]
    UnknownPackage(PackageId),

    #[error("A recipe filter needs an owning package; pass --package or run next to a recipes.toml")]
    MissingOwnPackage,

    #[error("Package '{0}' is declared more than once")]
    DuplicatePackage(PackageId),

    #[error("Module '{module}' is declared by both '{first}' and '{second}'")]
    DuplicateModule { module: String, first: PackageId, second: PackageId },

    #[error("Invalid manifest {file}: {source}")]
    Manifest { file: PathBuf, source: toml::de::Error },

    #[error("Invalid config {file}: {source}")]
    Config { file: PathBuf, source: toml::de::Error },

    #[error("Cannot read config {file}: {source}")]
    ConfigRead { file: PathBuf, source: std::io::Error },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid query: {0}")]
    Query(String),
}
