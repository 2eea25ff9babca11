//! Batch optimization of an image directory.
//!
//! Lists the top level of [`OptimizeConfig::image_dir`] once, in the order the
//! filesystem returns entries, classifies each regular file with
//! [`policy::classify`](crate::policy::classify), and recompresses JPEGs in
//! place. Per file:
//!
//! ```text
//! discovered → classified → skipped                      (hero, other files, dirs)
//!                         → transformed → Optimized      (reported, counted)
//!                         → transformed → Failed         (reported, before-size counted)
//! ```
//!
//! A failure never stops the run. Each transformed file produces a
//! [`FileOutcome`] value which is handed to the event callback as soon as it
//! is known and folded into the [`RunSummary`].

use crate::config::{ConfigError, OptimizeConfig};
use crate::imaging::{ImageBackend, RustBackend, optimize_jpeg};
use crate::policy::{Action, classify};
use std::fs::DirEntry;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("cannot read {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Outcome of one attempted transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Optimized {
        name: String,
        before: u64,
        after: u64,
    },
    Failed {
        name: String,
        /// Size before the attempt, when it could be read.
        before: Option<u64>,
        reason: String,
    },
}

impl FileOutcome {
    pub fn name(&self) -> &str {
        match self {
            FileOutcome::Optimized { name, .. } | FileOutcome::Failed { name, .. } => name,
        }
    }
}

/// Progress events emitted during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptimizeEvent {
    /// The directory exists and is about to be scanned.
    Started { dir: PathBuf },
    /// A file finished, successfully or not.
    File(FileOutcome),
}

/// Byte totals across one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Pre-size of every attempted file, failed ones included.
    pub total_before: u64,
    /// Post-size of successfully optimized files.
    pub total_after: u64,
    pub optimized: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Optimized { before, after, .. } => {
                self.total_before += before;
                self.total_after += after;
                self.optimized += 1;
            }
            FileOutcome::Failed { before, .. } => {
                self.total_before += before.unwrap_or(0);
                self.failed += 1;
            }
        }
    }

    /// Overall reduction, or `None` when nothing was optimized.
    pub fn reduction_percent(&self) -> Option<f64> {
        (self.optimized > 0).then(|| reduction_percent(self.total_before, self.total_after))
    }
}

/// Size reduction in percent: `(1 - after / before) * 100`, 0 for empty inputs.
///
/// Negative when the file grew.
pub fn reduction_percent(before: u64, after: u64) -> f64 {
    if before == 0 {
        return 0.0;
    }
    (1.0 - after as f64 / before as f64) * 100.0
}

/// Result of a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    /// The target directory does not exist; nothing was touched.
    MissingDirectory(PathBuf),
    Completed {
        outcomes: Vec<FileOutcome>,
        summary: RunSummary,
    },
}

/// Name reported for a directory entry that could not be read at all.
pub const UNREADABLE_ENTRY: &str = "<entry>";

/// Optimize `config.image_dir` with the production backend.
pub fn optimize_dir(
    config: &OptimizeConfig,
    on_event: impl FnMut(&OptimizeEvent),
) -> Result<RunReport, OptimizeError> {
    optimize_dir_with_backend(&RustBackend::new(), config, on_event)
}

/// Optimize a directory using a specific backend (allows testing with mock).
pub fn optimize_dir_with_backend(
    backend: &impl ImageBackend,
    config: &OptimizeConfig,
    mut on_event: impl FnMut(&OptimizeEvent),
) -> Result<RunReport, OptimizeError> {
    config.validate()?;

    let dir = &config.image_dir;
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "image directory missing");
        return Ok(RunReport::MissingDirectory(dir.clone()));
    }

    // Listed up front: transforms create and rename temp files in this directory.
    let entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|source| OptimizeError::ReadDir {
            path: dir.clone(),
            source,
        })?
        .collect();

    on_event(&OptimizeEvent::Started { dir: dir.clone() });

    let mut outcomes = Vec::new();
    let mut summary = RunSummary::default();

    for entry in entries {
        let outcome = match entry {
            Ok(entry) => process_entry(backend, &entry, config),
            Err(e) => Some(FileOutcome::Failed {
                name: UNREADABLE_ENTRY.to_string(),
                before: None,
                reason: e.to_string(),
            }),
        };
        let Some(outcome) = outcome else { continue };

        if let FileOutcome::Failed { name, reason, .. } = &outcome {
            warn!(file = %name, error = %reason, "optimization failed");
        }
        summary.record(&outcome);
        on_event(&OptimizeEvent::File(outcome.clone()));
        outcomes.push(outcome);
    }

    Ok(RunReport::Completed { outcomes, summary })
}

/// Classify one directory entry and transform it if the policy says so.
///
/// Returns `None` for everything that is skipped.
fn process_entry(
    backend: &impl ImageBackend,
    entry: &DirEntry,
    config: &OptimizeConfig,
) -> Option<FileOutcome> {
    let path = entry.path();
    let name = entry.file_name().to_string_lossy().into_owned();

    // Follows symlinks; anything that cannot be stat'ed is not a regular file.
    let metadata = match std::fs::metadata(&path) {
        Ok(m) if m.is_file() => m,
        _ => {
            debug!(file = %name, "not a regular file");
            return None;
        }
    };

    let action = classify(&name, config);
    debug!(file = %name, ?action, "classified");
    if action != Action::RecompressJpeg {
        return None;
    }

    let before = metadata.len();
    Some(match transform(backend, &path, config) {
        Ok(after) => FileOutcome::Optimized {
            name,
            before,
            after,
        },
        Err(reason) => FileOutcome::Failed {
            name,
            before: Some(before),
            reason,
        },
    })
}

/// Recompress and return the new byte size.
fn transform(
    backend: &impl ImageBackend,
    path: &Path,
    config: &OptimizeConfig,
) -> Result<u64, String> {
    let (width, height) = optimize_jpeg(backend, path, config).map_err(|e| e.to_string())?;
    debug!(path = %path.display(), width, height, "recompressed");
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::{create_test_jpeg, create_test_png_rgba, decoded, file_digest};
    use std::fs;
    use tempfile::TempDir;

    fn config_for(dir: &Path) -> OptimizeConfig {
        OptimizeConfig::for_dir(dir)
    }

    fn run_mock(backend: &MockBackend, config: &OptimizeConfig) -> (RunReport, Vec<OptimizeEvent>) {
        let mut events = Vec::new();
        let report =
            optimize_dir_with_backend(backend, config, |e| events.push(e.clone())).unwrap();
        (report, events)
    }

    fn completed(report: RunReport) -> (Vec<FileOutcome>, RunSummary) {
        match report {
            RunReport::Completed { outcomes, summary } => (outcomes, summary),
            other => panic!("expected a completed run, got {other:?}"),
        }
    }

    // =========================================================================
    // reduction_percent / RunSummary
    // =========================================================================

    #[test]
    fn reduction_percent_basic() {
        assert_eq!(reduction_percent(1000, 250), 75.0);
        assert_eq!(reduction_percent(1000, 1000), 0.0);
    }

    #[test]
    fn reduction_percent_growth_is_negative() {
        let pct = reduction_percent(1000, 1100);
        assert!((pct + 10.0).abs() < 1e-9, "{pct}");
    }

    #[test]
    fn reduction_percent_zero_before() {
        assert_eq!(reduction_percent(0, 0), 0.0);
        assert_eq!(reduction_percent(0, 500), 0.0);
    }

    #[test]
    fn summary_counts_failed_before_only() {
        let mut summary = RunSummary::default();
        summary.record(&FileOutcome::Optimized {
            name: "a.jpg".into(),
            before: 4000,
            after: 1000,
        });
        summary.record(&FileOutcome::Failed {
            name: "b.jpg".into(),
            before: Some(2000),
            reason: "boom".into(),
        });

        assert_eq!(summary.total_before, 6000);
        assert_eq!(summary.total_after, 1000);
        assert_eq!(summary.optimized, 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn summary_without_successes_has_no_percent() {
        let mut summary = RunSummary::default();
        assert_eq!(summary.reduction_percent(), None);
        summary.record(&FileOutcome::Failed {
            name: "b.jpg".into(),
            before: Some(2000),
            reason: "boom".into(),
        });
        assert_eq!(summary.reduction_percent(), None);
    }

    // =========================================================================
    // Dispatcher with mock backend
    // =========================================================================

    #[test]
    fn missing_directory_is_reported_not_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("img");
        let backend = MockBackend::new();

        let (report, events) = run_mock(&backend, &config_for(&missing));

        assert_eq!(report, RunReport::MissingDirectory(missing));
        assert!(events.is_empty());
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn file_in_place_of_directory_counts_as_missing() {
        let tmp = TempDir::new().unwrap();
        let not_dir = tmp.path().join("img");
        fs::write(&not_dir, b"oops").unwrap();

        let (report, _) = run_mock(&MockBackend::new(), &config_for(&not_dir));
        assert!(matches!(report, RunReport::MissingDirectory(_)));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let config = OptimizeConfig {
            gallery_max: 0,
            ..config_for(tmp.path())
        };
        let result = optimize_dir_with_backend(&MockBackend::new(), &config, |_| {});
        assert!(matches!(result, Err(OptimizeError::Config(_))));
    }

    #[test]
    fn only_jpegs_reach_the_backend() {
        let tmp = TempDir::new().unwrap();
        for name in ["a.jpg", "b.JPEG", "hero-bread.png", "hero-bread.jpg", "logo.png", "notes.txt"] {
            fs::write(tmp.path().join(name), b"0123456789").unwrap();
        }
        fs::create_dir(tmp.path().join("nested.jpg")).unwrap();
        let backend = MockBackend::with_dimensions(&[("a.jpg", 2000, 1000), ("b.JPEG", 100, 50)]);

        let (report, events) = run_mock(&backend, &config_for(tmp.path()));
        let (outcomes, summary) = completed(report);

        let mut names: Vec<&str> = outcomes.iter().map(|o| o.name()).collect();
        names.sort();
        assert_eq!(names, vec!["a.jpg", "b.JPEG"]);
        assert_eq!(summary.optimized, 2);
        assert_eq!(summary.total_before, 20);

        // Started + one event per outcome
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], OptimizeEvent::Started { .. }));

        let recompressed: Vec<RecordedOp> = backend
            .get_operations()
            .into_iter()
            .filter(|op| matches!(op, RecordedOp::Recompress { .. }))
            .collect();
        assert_eq!(recompressed.len(), 2);
        assert!(recompressed.contains(&RecordedOp::Recompress {
            path: "a.jpg".into(),
            width: 900,
            height: 450,
            quality: 85,
        }));
    }

    #[test]
    fn failure_does_not_abort_the_run() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("broken.jpg"), b"xx").unwrap();
        fs::write(tmp.path().join("good.jpg"), b"0123").unwrap();
        let backend = MockBackend::with_dimensions(&[("good.jpg", 10, 10)])
            .failing("broken.jpg", "not an image");

        let (report, _) = run_mock(&backend, &config_for(tmp.path()));
        let (outcomes, summary) = completed(report);

        assert_eq!(outcomes.len(), 2);
        let broken = outcomes.iter().find(|o| o.name() == "broken.jpg").unwrap();
        assert!(matches!(
            broken,
            FileOutcome::Failed { before: Some(2), reason, .. } if reason.contains("not an image")
        ));
        assert_eq!(summary.optimized, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_before, 6);
        assert_eq!(summary.total_after, 4);
    }

    #[test]
    fn hero_is_never_handed_to_the_backend() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("HERO-BREAD.JPG"), b"hero").unwrap();
        let backend = MockBackend::new();

        let (report, _) = run_mock(&backend, &config_for(tmp.path()));
        let (outcomes, summary) = completed(report);

        assert!(outcomes.is_empty());
        assert_eq!(summary, RunSummary::default());
        assert!(backend.get_operations().is_empty());
    }

    // =========================================================================
    // End to end with the real backend
    // =========================================================================

    #[test]
    fn real_run_resizes_jpeg_and_leaves_the_rest() {
        let tmp = TempDir::new().unwrap();
        let photo = tmp.path().join("photo1.JPG");
        let hero = tmp.path().join("hero-bread.png");
        let other = tmp.path().join("logo.png");
        create_test_jpeg(&photo, 2000, 1000);
        create_test_png_rgba(&hero, 160, 90);
        create_test_png_rgba(&other, 40, 40);
        let hero_digest = file_digest(&hero);
        let other_digest = file_digest(&other);
        let photo_before = fs::metadata(&photo).unwrap().len();

        let report = optimize_dir(&config_for(tmp.path()), |_| {}).unwrap();
        let (outcomes, summary) = completed(report);

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].name(), "photo1.JPG");
        let (_, img) = decoded(&photo);
        assert_eq!((img.width(), img.height()), (900, 450));
        assert_eq!(file_digest(&hero), hero_digest);
        assert_eq!(file_digest(&other), other_digest);
        assert_eq!(summary.total_before, photo_before);
        assert_eq!(summary.total_after, fs::metadata(&photo).unwrap().len());
    }

    #[test]
    fn real_run_visits_each_jpeg_once_despite_temp_files() {
        let tmp = TempDir::new().unwrap();
        for i in 0..12 {
            create_test_jpeg(&tmp.path().join(format!("p{i:02}.jpg")), 40, 30);
        }

        let report = optimize_dir(&config_for(tmp.path()), |_| {}).unwrap();
        let (outcomes, summary) = completed(report);

        let mut names: Vec<_> = outcomes.iter().map(|o| o.name().to_string()).collect();
        names.sort();
        let expected: Vec<_> = (0..12).map(|i| format!("p{i:02}.jpg")).collect();
        assert_eq!(names, expected);
        assert_eq!(summary.optimized, 12);
        assert_eq!(summary.failed, 0);
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 12);
    }

    #[cfg(unix)]
    #[test]
    fn real_run_optimizes_symlink_target_and_keeps_link() {
        let tmp = TempDir::new().unwrap();
        let outside = tmp.path().join("outside");
        let img_dir = tmp.path().join("img");
        fs::create_dir(&outside).unwrap();
        fs::create_dir(&img_dir).unwrap();
        let real = outside.join("real.jpg");
        create_test_jpeg(&real, 2000, 1000);
        let link = img_dir.join("link.jpg");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let report = optimize_dir(&config_for(&img_dir), |_| {}).unwrap();
        let (outcomes, summary) = completed(report);

        assert_eq!(outcomes.len(), 1);
        assert_eq!(summary.optimized, 1);
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        let (_, img) = decoded(&real);
        assert_eq!((img.width(), img.height()), (900, 450));
    }

    #[test]
    fn unreadable_entry_label_is_not_a_path() {
        let line = crate::output::format_outcome(&FileOutcome::Failed {
            name: UNREADABLE_ENTRY.to_string(),
            before: None,
            reason: "Input/output error".into(),
        });
        assert_eq!(line, "  <entry>: skip (Input/output error)");
        assert!(!UNREADABLE_ENTRY.contains('/'));
    }

    #[test]
    fn real_run_reports_broken_jpeg() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("broken.jpg"), b"not a jpeg at all").unwrap();
        create_test_jpeg(&tmp.path().join("fine.jpg"), 100, 100);

        let report = optimize_dir(&config_for(tmp.path()), |_| {}).unwrap();
        let (outcomes, summary) = completed(report);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.optimized, 1);
        assert_eq!(
            fs::read(tmp.path().join("broken.jpg")).unwrap(),
            b"not a jpeg at all"
        );
    }
}
