//! Repository-relative path handling

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Separator used in the canonical string form of a [`RepoPath`].
pub const SEPARATOR: char = '/';

/// A repository-relative path: an ordered list of named components.
///
/// Components are non-empty and never contain the separator. The
/// canonical string form joins the components with `/`, with no leading
/// or trailing separator; the empty path renders as the empty string.
/// Equality and hashing are defined over the components, so two values
/// built through different constructors but denoting the same logical
/// path are interchangeable in sets and maps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RepoPath {
    components: Vec<String>,
}

impl RepoPath {
    /// The empty path. Renders as `""`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a path from a host-local path, resolving it first.
    ///
    /// Fails if the host path cannot be resolved on the local
    /// filesystem. Root and drive markers are folded into plain
    /// components; empty components are dropped.
    pub fn from_host_path(path: impl AsRef<Path>) -> Result<Self> {
        let resolved = dunce::canonicalize(path.as_ref())
            .map_err(|e| Error::unresolvable(path.as_ref(), e))?;
        Ok(Self::from(resolved.as_path()))
    }

    /// Build a path from its canonical string form.
    ///
    /// Splits on the separator and drops empty components, so leading,
    /// trailing, and doubled separators are tolerated.
    pub fn from_string(s: &str) -> Self {
        let components = s
            .split(SEPARATOR)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        Self { components }
    }

    /// Build a path from an explicit component list.
    ///
    /// Errors if any component is empty or contains the separator.
    pub fn from_components(components: impl IntoIterator<Item = String>) -> Result<Self> {
        let components: Vec<String> = components.into_iter().collect();
        for component in &components {
            if component.is_empty() {
                return Err(Error::invalid_component(component, "empty component"));
            }
            if component.contains(SEPARATOR) {
                return Err(Error::invalid_component(
                    component,
                    "component contains the separator",
                ));
            }
        }
        Ok(Self { components })
    }

    /// The ordered component list.
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True for the empty path.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Truncate to the last `depth` trailing components.
    ///
    /// Used to ignore client-side parent directories beyond a
    /// configured depth. A depth shorter than the path keeps the tail;
    /// a depth of zero is an invalid argument.
    pub fn tail(&self, depth: usize) -> Result<Self> {
        if depth == 0 {
            return Err(Error::InvalidDepth);
        }
        let skip = self.components.len().saturating_sub(depth);
        Ok(Self {
            components: self.components[skip..].to_vec(),
        })
    }

    /// The remaining child components if `parent` is a literal prefix
    /// of this path (exact, case-sensitive, in order).
    ///
    /// Returns `None` when this path is not a descendant of `parent`.
    /// A path outside the repository root is an expected outcome the
    /// caller branches on, not an error. A path is a descendant of
    /// itself; the remainder is then the empty path.
    pub fn relative_from(&self, parent: &RepoPath) -> Option<RepoPath> {
        if self.components.starts_with(&parent.components) {
            Some(Self {
                components: self.components[parent.components.len()..].to_vec(),
            })
        } else {
            None
        }
    }

    /// Component-wise append of another path.
    pub fn concat(&self, other: &RepoPath) -> Self {
        let mut components = self.components.clone();
        components.extend(other.components.iter().cloned());
        Self { components }
    }

    /// Append a single component.
    ///
    /// Errors if the component is empty or contains the separator.
    pub fn join(&self, component: &str) -> Result<Self> {
        if component.is_empty() {
            return Err(Error::invalid_component(component, "empty component"));
        }
        if component.contains(SEPARATOR) {
            return Err(Error::invalid_component(
                component,
                "component contains the separator",
            ));
        }
        let mut components = self.components.clone();
        components.push(component.to_string());
        Ok(Self { components })
    }

    /// A new path with every component rewritten by `f`.
    pub fn transform(&self, f: impl Fn(&str) -> String) -> Self {
        Self {
            components: self.components.iter().map(|c| f(c)).collect(),
        }
    }

    /// Append the components onto a host-local base directory.
    pub fn below(&self, base: impl Into<PathBuf>) -> PathBuf {
        let mut host = base.into();
        for component in &self.components {
            host.push(component);
        }
        host
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.components.join("/"))
    }
}

impl From<&str> for RepoPath {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

impl From<&Path> for RepoPath {
    fn from(path: &Path) -> Self {
        let mut components = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(c) => components.push(c.to_string_lossy().into_owned()),
                Component::Prefix(prefix) => {
                    let s = prefix.as_os_str().to_string_lossy().replace('\\', "");
                    if !s.is_empty() {
                        components.push(s);
                    }
                }
                _ => {}
            }
        }
        Self { components }
    }
}
