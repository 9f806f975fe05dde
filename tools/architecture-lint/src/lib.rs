//! Boundary lint for the `frontend` crate.
//!
//! `frontend/src` is split into three layers. `domain` holds the user
//! records, the normalizer, the directory service and the ports. `inbound`
//! holds the users view, which may only talk to the query ports. `outbound`
//! holds the HTTP repository. Every file under those three directories is
//! parsed with `syn`, each path it mentions is classified as a reference to
//! another layer, to an external crate or to a named item, and the
//! references each layer is not allowed to make are reported.
//!
//! Run it with `cargo run -p architecture-lint [FRONTEND_DIR]`.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::Visit;

/// Name under which integration code refers to the linted crate.
const CRATE_NAME: &str = "frontend";

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `frontend/src`.
    pub file: PathBuf,
    /// Human-readable description of the broken rule.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// The source tree could not be walked or read.
    Io(io::Error),
    /// A file is not valid Rust.
    Parse {
        /// File path relative to `frontend/src`.
        file: PathBuf,
        /// Parser diagnostic.
        message: String,
    },
    /// A file was handed in that lives outside `domain`, `inbound` and
    /// `outbound`.
    Unlayered(PathBuf),
    /// One or more boundary violations were found.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cannot read frontend sources: {err}"),
            Self::Parse { file, message } => {
                write!(f, "cannot parse {}: {message}", file.display())
            }
            Self::Unlayered(file) => write!(
                f,
                "{} is not under domain/, inbound/ or outbound/",
                file.display()
            ),
            Self::Violations(violations) => {
                writeln!(f, "{} layer boundary violation(s):", violations.len())?;
                violations
                    .iter()
                    .try_for_each(|violation| writeln!(f, "  {violation}"))
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ArchitectureLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `frontend/src`.
    pub file: PathBuf,
    /// Full Rust source text.
    pub contents: String,
}

/// Lint the frontend crate sources on disk.
///
/// `frontend_dir` must be the `frontend/` directory at the repository root.
/// Only files under `src/domain`, `src/inbound` and `src/outbound` are
/// inspected. Returns how many files were checked.
pub fn lint_frontend_sources(frontend_dir: &Path) -> Result<usize, ArchitectureLintError> {
    let src_dir = frontend_dir.join("src");
    if !src_dir.is_dir() {
        return Err(ArchitectureLintError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no source directory at {}", src_dir.display()),
        )));
    }
    let sources = read_layered_sources(&src_dir)?;
    lint_sources(&sources)?;
    Ok(sources.len())
}

/// Lint the provided Rust sources. Intended for unit and behaviour tests.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let layer = ModuleLayer::of_file(&source.file)
            .ok_or_else(|| ArchitectureLintError::Unlayered(source.file.clone()))?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;

        let mut collector = ReferenceCollector::default();
        collector.visit_file(&parsed);
        violations.extend(
            collector
                .references
                .iter()
                .filter(|reference| layer.forbids(reference))
                .map(|reference| Violation {
                    file: source.file.clone(),
                    message: layer.describe(reference),
                }),
        );
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// Layer a file belongs to, taken from its first directory under `src`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ModuleLayer {
    Domain,
    Inbound,
    Outbound,
}

impl ModuleLayer {
    const ALL: [Self; 3] = [Self::Domain, Self::Inbound, Self::Outbound];

    const fn dir_name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|layer| layer.dir_name() == name)
    }

    fn of_file(relative_path: &Path) -> Option<Self> {
        let first = relative_path.components().next()?;
        Self::from_dir_name(first.as_os_str().to_str()?)
    }

    /// Layers this layer must not reach into.
    const fn banned_layers(self) -> &'static [Self] {
        match self {
            Self::Domain => &[Self::Inbound, Self::Outbound],
            Self::Inbound => &[Self::Outbound],
            Self::Outbound => &[Self::Inbound],
        }
    }

    /// HTTP crates this layer must not use. The domain stays transport
    /// free, the view never speaks HTTP itself, and the repository is a
    /// client, never a server.
    const fn banned_crates(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["actix_web", "awc", "hyper", "reqwest"],
            Self::Inbound => &["hyper", "reqwest"],
            Self::Outbound => &["actix_web", "awc"],
        }
    }

    /// Domain items a layer must not name even though their module is
    /// reachable. The view sees the query ports, never the data source or
    /// the concrete service behind them.
    const fn banned_items(self) -> &'static [&'static str] {
        match self {
            Self::Inbound => &[
                "FixtureUserRepository",
                "UserDirectoryService",
                "UserRepository",
                "UserRepositoryError",
            ],
            Self::Domain | Self::Outbound => &[],
        }
    }

    fn forbids(self, reference: &Reference) -> bool {
        match reference {
            Reference::Layer(target) => self.banned_layers().contains(target),
            Reference::Crate(name) => self.banned_crates().contains(&name.as_str()),
            Reference::Item(name) => self.banned_items().contains(&name.as_str()),
        }
    }

    fn describe(self, reference: &Reference) -> String {
        let layer = self.dir_name();
        match reference {
            Reference::Layer(target) => format!(
                "{layer} module must not depend on crate::{}",
                target.dir_name()
            ),
            Reference::Crate(name) => {
                format!("{layer} module must not depend on external crate `{name}`")
            }
            Reference::Item(name) => format!(
                "{layer} module must not name `{name}`; depend on a query port instead"
            ),
        }
    }
}

/// Something a source file points at through a path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Reference {
    Layer(ModuleLayer),
    Crate(String),
    Item(String),
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// Classify one path, given as its identifier segments.
///
/// The root is a layer when the path starts at the crate (`crate::`,
/// `super::`, `frontend::`) or names a layer directly; any other root is an
/// external crate. Capitalised segments are also reported as items.
fn references_of(segments: &[String]) -> Vec<Reference> {
    let Some(first) = segments.first() else {
        return Vec::new();
    };

    let mut references = segments
        .iter()
        .filter(|segment| segment.starts_with(char::is_uppercase))
        .map(|segment| Reference::Item(segment.clone()))
        .collect::<Vec<_>>();

    if is_relative(first) || first == CRATE_NAME {
        let layer = segments
            .iter()
            .find(|segment| !is_relative(segment) && segment.as_str() != CRATE_NAME)
            .and_then(|segment| ModuleLayer::from_dir_name(segment));
        references.extend(layer.map(Reference::Layer));
    } else if let Some(layer) = ModuleLayer::from_dir_name(first) {
        references.push(Reference::Layer(layer));
    } else if !first.starts_with(char::is_uppercase) {
        references.push(Reference::Crate(first.clone()));
    }
    references
}

/// Every path named by a `use` tree, one per leaf.
fn use_tree_paths(tree: &syn::UseTree) -> Vec<Vec<String>> {
    let mut paths = Vec::new();
    let mut pending = vec![(tree, Vec::new())];
    while let Some((tree, mut prefix)) = pending.pop() {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                pending.push((&path.tree, prefix));
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                paths.push(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                paths.push(prefix);
            }
            syn::UseTree::Glob(_) => paths.push(prefix),
            syn::UseTree::Group(group) => {
                pending.extend(group.items.iter().map(|item| (item, prefix.clone())));
            }
        }
    }
    paths
}

#[derive(Default)]
struct ReferenceCollector {
    references: BTreeSet<Reference>,
}

impl ReferenceCollector {
    fn note(&mut self, segments: &[String]) {
        self.references.extend(references_of(segments));
    }
}

impl<'ast> Visit<'ast> for ReferenceCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect::<Vec<_>>();
        self.note(&segments);
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        for segments in use_tree_paths(&node.tree) {
            self.note(&segments);
        }
    }
}

/// Read every `.rs` file under the three layer directories of `src_dir`,
/// sorted by path.
fn read_layered_sources(src_dir: &Path) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let mut pending = ModuleLayer::ALL
        .iter()
        .map(|layer| src_dir.join(layer.dir_name()))
        .filter(|dir| dir.is_dir())
        .collect::<Vec<_>>();
    let mut sources = Vec::new();

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                let file = path
                    .strip_prefix(src_dir)
                    .map_err(|err| io::Error::other(err.to_string()))?
                    .to_path_buf();
                let contents = fs::read_to_string(&path)?;
                sources.push(LintSource { file, contents });
            }
        }
    }

    sources.sort_by(|left, right| left.file.cmp(&right.file));
    Ok(sources)
}
