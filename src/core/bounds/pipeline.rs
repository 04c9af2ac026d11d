//! Page Pipeline
//!
//! Runs the detectors over one page and collects everything a caller needs
//! to report on it: the labels used, the boundaries with their pixel rows,
//! the label fidelity, or the error that stopped the page.
//!
//! A failed page keeps whatever was already learned about it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::core::llm::StructuredGateway;

use super::discovery::LabelDiscovery;
use super::error::DetectionError;
use super::fidelity::{check_label_fidelity, LabelFidelity};
use super::instruction::{DetectionInstruction, DetectorConfig};
use super::labeled::LabeledBoundaryDetector;
use super::page::PageImage;
use super::types::{BoundaryValue, Label, LabeledBoundary};
use super::unlabeled::UnlabeledBoundaryDetector;

/// Why a page produced no boundaries
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Detection(#[from] DetectionError),
}

/// Which detection flow a page goes through
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageMode {
    /// Boundaries only, no labels
    Unlabeled,
    /// Resolve these labels, or discover them first when `None`
    Labeled(Option<Vec<Label>>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundaryReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    pub upper_bound: BoundaryValue,
    /// Pixel row in the submitted image, when its height is readable
    pub pixel_y: Option<u32>,
}

impl BoundaryReport {
    fn new(label: Option<Label>, upper_bound: BoundaryValue, height: Option<u32>) -> Self {
        Self {
            label,
            upper_bound,
            pixel_y: height.and_then(|h| upper_bound.to_pixel(h)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageReport {
    pub page: PathBuf,
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<Label>>,
    pub boundaries: Vec<BoundaryReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fidelity: Option<LabelFidelity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageReport {
    pub fn new(page: impl Into<PathBuf>) -> Self {
        Self {
            page: page.into(),
            ..Default::default()
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// The three detectors sharing one gateway
pub struct PagePipeline {
    discovery: LabelDiscovery,
    unlabeled: UnlabeledBoundaryDetector,
    labeled: LabeledBoundaryDetector,
}

impl PagePipeline {
    /// Pipeline with the built-in discovery and unlabeled configurations and
    /// `labeled_instruction` for label-conditioned localization.
    pub fn new(gateway: Arc<dyn StructuredGateway>, labeled_instruction: DetectionInstruction) -> Self {
        Self {
            discovery: LabelDiscovery::new(gateway.clone()),
            unlabeled: UnlabeledBoundaryDetector::new(gateway.clone()),
            labeled: LabeledBoundaryDetector::with_config(
                gateway,
                DetectorConfig::labeled_boundaries(labeled_instruction),
            ),
        }
    }

    /// Read `path` and run it through the pipeline.
    pub async fn process_file(&self, path: &Path, mode: &PageMode) -> PageReport {
        let mut report = PageReport::new(path);
        let page = match tokio::fs::read(path).await {
            Ok(bytes) => PageImage::new(bytes).map_err(PageError::from),
            Err(source) => Err(PageError::Read {
                path: path.to_path_buf(),
                source,
            }),
        };

        match page {
            Ok(page) => self.fill_report(&page, mode, &mut report).await,
            Err(e) => Self::fail(&mut report, e),
        }
        report
    }

    /// Run an already loaded page through the pipeline.
    pub async fn process_page(
        &self,
        name: impl Into<PathBuf>,
        page: &PageImage,
        mode: &PageMode,
    ) -> PageReport {
        let mut report = PageReport::new(name);
        self.fill_report(page, mode, &mut report).await;
        report
    }

    async fn fill_report(&self, page: &PageImage, mode: &PageMode, report: &mut PageReport) {
        report.height = page.height();
        let outcome = match mode {
            PageMode::Unlabeled => self.fill_unlabeled(page, report).await,
            PageMode::Labeled(requested) => {
                self.fill_labeled(page, requested.as_deref(), report).await
            }
        };
        if let Err(e) = outcome {
            Self::fail(report, e.into());
        }
    }

    async fn fill_unlabeled(
        &self,
        page: &PageImage,
        report: &mut PageReport,
    ) -> Result<(), DetectionError> {
        let bounds = self.unlabeled.detect_boundaries(page).await?;
        let height = report.height;
        report.boundaries = bounds
            .into_iter()
            .map(|b| BoundaryReport::new(None, b, height))
            .collect();
        Ok(())
    }

    async fn fill_labeled(
        &self,
        page: &PageImage,
        requested: Option<&[Label]>,
        report: &mut PageReport,
    ) -> Result<(), DetectionError> {
        let labels = match requested {
            Some(labels) => labels.to_vec(),
            None => self.discovery.discover(page).await?,
        };
        // kept even if localization fails below
        report.labels = Some(labels.clone());

        let resolved = self
            .labeled
            .detect_with_config_instruction(page, &labels)
            .await?;

        let fidelity = check_label_fidelity(&labels, &resolved);
        if !fidelity.is_exact() {
            log::warn!(
                "{}: engine labels differ from request (missing {:?}, unexpected {:?})",
                report.page.display(),
                fidelity.missing,
                fidelity.unexpected
            );
        }

        let height = report.height;
        report.boundaries = resolved
            .into_iter()
            .map(|LabeledBoundary { solution_number, upper_bound }| {
                BoundaryReport::new(Some(solution_number), upper_bound, height)
            })
            .collect();
        report.fidelity = Some(fidelity);
        Ok(())
    }

    fn fail(report: &mut PageReport, err: PageError) {
        log::error!("{}: {}", report.page.display(), err);
        report.error = Some(err.to_string());
    }
}
