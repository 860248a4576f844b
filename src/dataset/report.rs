//! Dataset build report.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::classes::ClassTable;
use crate::manifest::ManifestEntry;

/// An image that could not be turned into a training pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageFailure {
    pub image: PathBuf,
    pub message: String,
}

/// The outcome of a dataset build.
#[derive(Clone, Debug, Serialize)]
pub struct BuildReport {
    /// Number of images discovered under the input root.
    pub images_found: usize,
    /// Written pairs, in discovery order.
    pub entries: Vec<ManifestEntry>,
    /// Images that were skipped, with the reason.
    pub failures: Vec<ImageFailure>,
    pub classes: ClassTable,
    pub manifest_path: PathBuf,
    pub classes_path: PathBuf,
}

impl BuildReport {
    pub fn written_count(&self) -> usize {
        self.entries.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Returns true if every discovered image was written.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Built {} of {} image(s); {} failed",
            self.written_count(),
            self.images_found,
            self.failure_count()
        )?;
        writeln!(f, "  manifest: {}", self.manifest_path.display())?;
        writeln!(
            f,
            "  classes:  {} ({} classes)",
            self.classes_path.display(),
            self.classes.len()
        )?;

        if !self.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Failures:")?;
            for failure in &self.failures {
                writeln!(f, "  {}: {}", failure.image.display(), failure.message)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::{class_table, ChannelSet};

    fn report(failures: Vec<ImageFailure>) -> BuildReport {
        BuildReport {
            images_found: 2,
            entries: vec![ManifestEntry::new("/o/images/A_1.jpg", "/o/labels/A_1.png")],
            failures,
            classes: class_table(
                ChannelSet {
                    baselines: true,
                    ..Default::default()
                },
                false,
            ),
            manifest_path: PathBuf::from("/o/set_data.csv"),
            classes_path: PathBuf::from("/o/classes.txt"),
        }
    }

    #[test]
    fn display_lists_failures() {
        let text = report(vec![ImageFailure {
            image: PathBuf::from("/in/A_x/2.jpg"),
            message: "Companion PAGE file not found".to_string(),
        }])
        .to_string();

        assert!(text.starts_with("Built 1 of 2 image(s); 1 failed"));
        assert!(text.contains("(2 classes)"));
        assert!(text.contains("/in/A_x/2.jpg: Companion PAGE file not found"));
    }

    #[test]
    fn complete_report_has_no_failure_section() {
        let report = report(Vec::new());
        assert!(report.is_complete());
        assert!(!report.to_string().contains("Failures:"));
    }
}
