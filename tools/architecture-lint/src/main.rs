//! CLI entry point for the repo-local architecture lint.
//!
//! Usage: `architecture-lint [FRONTEND_DIR]`. Without an argument the
//! `frontend/` directory of the enclosing workspace is linted.

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let frontend_dir = match frontend_dir(env::args_os().nth(1)) {
        Ok(dir) => dir,
        Err(err) => return report_failure(&err),
    };
    match architecture_lint::lint_frontend_sources(&frontend_dir) {
        Ok(checked) => {
            let _ = writeln!(
                io::stdout().lock(),
                "architecture lint passed ({checked} files under {})",
                frontend_dir.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => report_failure(&err),
    }
}

fn report_failure(err: &dyn std::error::Error) -> ExitCode {
    let _ = writeln!(io::stderr().lock(), "{err}");
    ExitCode::FAILURE
}

fn frontend_dir(explicit: Option<OsString>) -> Result<PathBuf, RepoRootError> {
    match explicit {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => repo_root().map(|root| root.join("frontend")),
    }
}

#[derive(Debug, Clone, Copy)]
struct RepoRootError;

impl fmt::Display for RepoRootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unable to locate workspace root (directory containing a workspace Cargo.toml); \
             pass the frontend directory explicitly"
        )
    }
}

impl std::error::Error for RepoRootError {}

fn repo_root() -> Result<PathBuf, RepoRootError> {
    [
        env::var_os("CARGO_WORKSPACE_DIR").map(PathBuf::from),
        env::current_dir().ok(),
        Some(PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
    ]
    .into_iter()
    .flatten()
    .find_map(|start| find_workspace_root(&start))
    .ok_or(RepoRootError)
}

fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| declares_workspace(&dir.join("Cargo.toml")))
        .map(Path::to_path_buf)
}

fn declares_workspace(manifest: &Path) -> bool {
    fs::read_to_string(manifest)
        .ok()
        .is_some_and(|contents| contents.contains("[workspace]"))
}
