//! Case folder identification.
//!
//! Sweep cases live in folders named `run_U<velocity>_Tp<porous temperature>`.
//! The pattern may appear anywhere in the name.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Prefix that marks a folder as a sweep case during discovery.
pub const CASE_PREFIX: &str = "run_U";

static CASE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"run_U([0-9]+)_Tp([0-9]+)").expect("case name pattern compiles"));

/// The two sweep parameters encoded in a case folder name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaseParams {
    /// Inlet air velocity tag (`U`).
    pub velocity: u32,
    /// Porous-region inlet temperature tag (`Tp`).
    pub porous_temperature: u32,
}

/// A simulation case on disk. Immutable once identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    name: String,
    root: PathBuf,
    params: Option<CaseParams>,
}

impl Case {
    /// Identify a case from its folder path.
    ///
    /// Paths without a final name component (`.`, `..`, `run/..`) are
    /// resolved on disk first so the folder name is still found.
    pub fn from_dir(root: &Path) -> Self {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .or_else(|| {
                let resolved = root.canonicalize().ok()?;
                resolved.file_name().map(|n| n.to_string_lossy().to_string())
            })
            .unwrap_or_default();
        let params = parse_case_name(&name);
        Self {
            name,
            root: root.to_path_buf(),
            params,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn params(&self) -> Option<CaseParams> {
        self.params
    }

    pub fn post_processing_dir(&self) -> PathBuf {
        self.root.join("postProcessing")
    }
}

/// Whether a folder name looks like a sweep case.
pub fn is_case_folder(name: &str) -> bool {
    name.starts_with(CASE_PREFIX)
}

/// Extract `(U, Tp)` from a folder name such as `run_U5_Tp400`.
///
/// The first occurrence of the pattern is used. Returns `None` when the
/// pattern is absent or a number does not fit in `u32`.
pub fn parse_case_name(name: &str) -> Option<CaseParams> {
    let caps = CASE_NAME_RE.captures(name)?;
    Some(CaseParams {
        velocity: caps[1].parse().ok()?,
        porous_temperature: caps[2].parse().ok()?,
    })
}
