//! Registry of recipe packages.
//!
//! A package owns a set of recipe modules and recipes, each declaring the
//! names of the modules it depends on. The graph builder only talks to the
//! [`Registry`] and [`RecipeView`] traits; [`Universe`] is the in-memory
//! implementation, populated from `recipes.toml` manifests (see [`manifest`])
//! or directly through [`PackageManifest`] builders.
use crate::errors::DepGraphError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

pub mod manifest;

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[serde(transparent)]
pub struct PackageId(pub String);

impl PackageId {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PackageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A resolved recipe module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDef {
    pub name: String,
    pub deps: Vec<String>,
}

/// A resolved recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDef {
    pub name: String,
    pub deps: Vec<String>,
}

/// Source of truth for which modules exist and what they depend on.
pub trait Registry {
    /// Every `(package, module)` pair known to the registry.
    fn modules(&self) -> Vec<(PackageId, String)>;

    /// Resolve a module of `package` to its declared dependencies.
    ///
    /// # Errors
    /// Returns `DepGraphError::UnknownPackage` or `DepGraphError::UnknownModule`
    /// if the pair is not declared.
    fn resolve_module(&self, package: &PackageId, name: &str) -> Result<ModuleDef, DepGraphError>;

    /// Narrow the registry to the recipes visible from `package`.
    ///
    /// # Errors
    /// Returns `DepGraphError::UnknownPackage` if `package` is not declared.
    fn scope_to_package(
        &self,
        package: &PackageId,
    ) -> Result<Box<dyn RecipeView + '_>, DepGraphError>;
}

/// Recipes visible from a single owning package.
pub trait RecipeView {
    fn recipes(&self) -> Vec<String>;

    /// # Errors
    /// Returns `DepGraphError::UnknownRecipe` if `name` is not visible in this view.
    fn resolve_recipe(&self, name: &str) -> Result<RecipeDef, DepGraphError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    #[serde(default)]
    pub deps: Vec<String>,
}

impl Declaration {
    fn from_deps(deps: &[&str]) -> Self {
        Self { deps: deps.iter().map(|d| (*d).to_string()).collect() }
    }
}

/// Contents of one package: its modules and recipes keyed by name.
#[derive(Debug, Clone)]
pub struct PackageManifest {
    pub name: PackageId,
    pub modules: BTreeMap<String, Declaration>,
    pub recipes: BTreeMap<String, Declaration>,
    /// Manifest file this package was loaded from, if any.
    pub path: Option<PathBuf>,
}

impl PackageManifest {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: PackageId::new(name),
            modules: BTreeMap::new(),
            recipes: BTreeMap::new(),
            path: None,
        }
    }

    #[must_use]
    pub fn module(mut self, name: &str, deps: &[&str]) -> Self {
        self.modules.insert(name.to_string(), Declaration::from_deps(deps));
        self
    }

    #[must_use]
    pub fn recipe(mut self, name: &str, deps: &[&str]) -> Self {
        self.recipes.insert(name.to_string(), Declaration::from_deps(deps));
        self
    }
}

/// In-memory registry over a set of packages.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    packages: BTreeMap<PackageId, PackageManifest>,
    module_index: BTreeMap<String, PackageId>,
}

impl Universe {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a universe from `packages`, failing on the first conflict.
    ///
    /// # Errors
    /// See [`Universe::add_package`].
    pub fn from_packages<I>(packages: I) -> Result<Self, DepGraphError>
    where
        I: IntoIterator<Item = PackageManifest>,
    {
        let mut universe = Self::new();
        for p in packages {
            universe.add_package(p)?;
        }
        Ok(universe)
    }

    /// Register a package.
    ///
    /// Module names share one namespace across packages, since the rendered
    /// graph labels modules by bare name.
    ///
    /// # Errors
    /// Returns `DepGraphError::DuplicatePackage` if the package name is taken,
    /// or `DepGraphError::DuplicateModule` if one of its modules is already
    /// declared by another package.
    pub fn add_package(&mut self, manifest: PackageManifest) -> Result<(), DepGraphError> {
        if self.packages.contains_key(&manifest.name) {
            return Err(DepGraphError::DuplicatePackage(manifest.name));
        }
        for module in manifest.modules.keys() {
            if let Some(first) = self.module_index.get(module) {
                return Err(DepGraphError::DuplicateModule {
                    module: module.clone(),
                    first: first.clone(),
                    second: manifest.name.clone(),
                });
            }
        }
        for module in manifest.modules.keys() {
            self.module_index.insert(module.clone(), manifest.name.clone());
        }
        self.packages.insert(manifest.name.clone(), manifest);
        Ok(())
    }

    #[must_use]
    pub fn package(&self, id: &PackageId) -> Option<&PackageManifest> {
        self.packages.get(id)
    }

    pub fn packages(&self) -> impl Iterator<Item = &PackageManifest> {
        self.packages.values()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl Registry for Universe {
    fn modules(&self) -> Vec<(PackageId, String)> {
        self.packages
            .values()
            .flat_map(|p| p.modules.keys().map(|m| (p.name.clone(), m.clone())))
            .collect()
    }

    fn resolve_module(&self, package: &PackageId, name: &str) -> Result<ModuleDef, DepGraphError> {
        let manifest =
            self.packages.get(package).ok_or_else(|| DepGraphError::UnknownPackage(package.clone()))?;
        let decl = manifest.modules.get(name).ok_or_else(|| DepGraphError::UnknownModule {
            module: name.to_string(),
            referenced_by: format!("package '{package}'"),
        })?;
        Ok(ModuleDef { name: name.to_string(), deps: decl.deps.clone() })
    }

    fn scope_to_package(
        &self,
        package: &PackageId,
    ) -> Result<Box<dyn RecipeView + '_>, DepGraphError> {
        let manifest =
            self.packages.get(package).ok_or_else(|| DepGraphError::UnknownPackage(package.clone()))?;
        Ok(Box::new(UniverseView { manifest }))
    }
}

/// Recipes of one package inside a [`Universe`].
pub struct UniverseView<'a> {
    manifest: &'a PackageManifest,
}

impl RecipeView for UniverseView<'_> {
    fn recipes(&self) -> Vec<String> {
        self.manifest.recipes.keys().cloned().collect()
    }

    fn resolve_recipe(&self, name: &str) -> Result<RecipeDef, DepGraphError> {
        let decl = self
            .manifest
            .recipes
            .get(name)
            .ok_or_else(|| DepGraphError::UnknownRecipe { recipe: name.to_string() })?;
        Ok(RecipeDef { name: name.to_string(), deps: decl.deps.clone() })
    }
}
