//! Locating the monitor output file for a KPI inside a case.
//!
//! Solvers write `postProcessing/<kpi>/<time>/<name>.dat` for single-region
//! cases and `postProcessing/<region>/<kpi>/<time>/<name>.dat` for
//! multi-region cases. Candidates are tried in that order and the first
//! directory holding any matching file wins; results are never merged.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use hx_core::KpiRegistry;
use tracing::debug;
use walkdir::WalkDir;

use crate::{SeriesError, SeriesResult};

const POST_PROCESSING_DIR: &str = "postProcessing";
const DEFAULT_EXTENSION: &str = "dat";

/// Decides which of several matching files is the most recent one.
pub trait FileOrdering: Debug + Send + Sync {
    fn compare(&self, a: &Path, b: &Path) -> Ordering;

    fn latest<'a>(&self, paths: &'a [PathBuf]) -> Option<&'a PathBuf> {
        paths.iter().max_by(|a, b| self.compare(a, b))
    }
}

/// Component-wise string order of the full path.
///
/// Relies on time directories sorting correctly as strings. `100` sorts
/// before `20`, so unpadded restart folders can pick the wrong file.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalOrder;

impl FileOrdering for LexicalOrder {
    fn compare(&self, a: &Path, b: &Path) -> Ordering {
        a.cmp(b)
    }
}

/// Like [`LexicalOrder`], but components that both parse as numbers are
/// compared numerically, so time directory `100` sorts after `20`.
///
/// Numeric components sort before non-numeric ones, which keeps the order
/// total when both kinds share a directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericTimestepOrder;

impl FileOrdering for NumericTimestepOrder {
    fn compare(&self, a: &Path, b: &Path) -> Ordering {
        let mut lhs = a.components();
        let mut rhs = b.components();
        loop {
            match (lhs.next(), rhs.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(x), Some(y)) => {
                    let ord = compare_components(x, y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
            }
        }
    }
}

fn compare_components(x: Component<'_>, y: Component<'_>) -> Ordering {
    match (numeric_component(x), numeric_component(y)) {
        (Some(xv), Some(yv)) => xv.total_cmp(&yv).then_with(|| x.cmp(&y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => x.cmp(&y),
    }
}

fn numeric_component(c: Component<'_>) -> Option<f64> {
    c.as_os_str()
        .to_str()?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[derive(Debug, Clone)]
pub struct SeriesLocator {
    registry: Arc<KpiRegistry>,
    extension: String,
    ordering: Arc<dyn FileOrdering>,
}

impl SeriesLocator {
    pub fn new(registry: Arc<KpiRegistry>) -> Self {
        Self {
            registry,
            extension: DEFAULT_EXTENSION.to_string(),
            ordering: Arc::new(LexicalOrder),
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_ordering(mut self, ordering: Arc<dyn FileOrdering>) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn registry(&self) -> &KpiRegistry {
        &self.registry
    }

    /// Directories searched for `kpi`, in priority order.
    ///
    /// Unregistered KPIs have no candidates.
    pub fn candidate_dirs(&self, case_root: &Path, kpi: &str) -> Vec<PathBuf> {
        let Some(def) = self.registry.kpi(kpi) else {
            return Vec::new();
        };
        let post = case_root.join(POST_PROCESSING_DIR);
        let mut candidates = vec![post.join(&def.name)];
        if let Some(region) = &def.region {
            candidates.push(post.join(region).join(&def.name));
        }
        candidates
    }

    /// Find the latest series file for `kpi`. `Ok(None)` means no data.
    pub fn locate(&self, case_root: &Path, kpi: &str) -> SeriesResult<Option<PathBuf>> {
        let candidates = self.candidate_dirs(case_root, kpi);
        if candidates.is_empty() {
            debug!(kpi, "not a registered KPI");
            return Ok(None);
        }

        for dir in candidates {
            let files = self.matching_files(&dir)?;
            if let Some(latest) = self.ordering.latest(&files) {
                debug!(kpi, file = %latest.display(), "located series file");
                return Ok(Some(latest.clone()));
            }
        }

        debug!(kpi, case = %case_root.display(), "no series file found");
        Ok(None)
    }

    fn matching_files(&self, dir: &Path) -> SeriesResult<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir) {
            let entry = entry.map_err(|source| SeriesError::Walk {
                path: dir.to_path_buf(),
                source,
            })?;
            // `is_file` on the path follows symlinks; walkdir's file type does not.
            if !entry.file_type().is_dir()
                && entry.path().is_file()
                && entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext == self.extension.as_str())
            {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_order_is_string_order() {
        let paths = vec![
            PathBuf::from("Tin_air/100/surfaceFieldValue.dat"),
            PathBuf::from("Tin_air/20/surfaceFieldValue.dat"),
            PathBuf::from("Tin_air/0/surfaceFieldValue.dat"),
        ];
        assert_eq!(LexicalOrder.latest(&paths), Some(&paths[1]));
    }

    #[test]
    fn numeric_order_compares_time_dirs_as_numbers() {
        let paths = vec![
            PathBuf::from("Tin_air/100/surfaceFieldValue.dat"),
            PathBuf::from("Tin_air/20/surfaceFieldValue.dat"),
            PathBuf::from("Tin_air/0.5/surfaceFieldValue.dat"),
        ];
        assert_eq!(NumericTimestepOrder.latest(&paths), Some(&paths[0]));
    }

    #[test]
    fn numeric_order_falls_back_to_names() {
        let a = Path::new("Tin_air/0/a.dat");
        let b = Path::new("Tin_air/0/b.dat");
        assert_eq!(NumericTimestepOrder.compare(a, b), Ordering::Less);
        assert_eq!(NumericTimestepOrder.compare(a, a), Ordering::Equal);
    }

    #[test]
    fn numeric_order_puts_numbers_before_names() {
        let num = Path::new("Tin_air/10/s.dat");
        let small = Path::new("Tin_air/9/s.dat");
        let name = Path::new("Tin_air/1a/s.dat");
        assert_eq!(NumericTimestepOrder.compare(small, num), Ordering::Less);
        assert_eq!(NumericTimestepOrder.compare(num, name), Ordering::Less);
        assert_eq!(NumericTimestepOrder.compare(small, name), Ordering::Less);
        assert_eq!(NumericTimestepOrder.compare(name, small), Ordering::Greater);
    }

    #[test]
    fn numeric_order_latest_ignores_input_order() {
        let paths = [
            PathBuf::from("Tin_air/1a/s.dat"),
            PathBuf::from("Tin_air/9/s.dat"),
            PathBuf::from("Tin_air/10/s.dat"),
        ];
        let expected = PathBuf::from("Tin_air/1a/s.dat");
        for shift in 0..paths.len() {
            let mut rotated = paths.to_vec();
            rotated.rotate_left(shift);
            assert_eq!(NumericTimestepOrder.latest(&rotated), Some(&expected));
        }
    }

    #[test]
    fn candidates_put_flat_layout_first() {
        let locator = SeriesLocator::new(Arc::new(KpiRegistry::standard()));
        let dirs = locator.candidate_dirs(Path::new("case"), "Tout_porous");
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("case/postProcessing/Tout_porous"),
                PathBuf::from("case/postProcessing/porous/Tout_porous"),
            ]
        );
        assert!(locator.candidate_dirs(Path::new("case"), "nope").is_empty());
    }

    #[test]
    fn extension_option_strips_dot() {
        let locator =
            SeriesLocator::new(Arc::new(KpiRegistry::standard())).with_extension(".xy");
        assert_eq!(locator.extension, "xy");
    }
}
