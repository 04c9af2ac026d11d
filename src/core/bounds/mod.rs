//! Solution Boundary Detection
//!
//! Turns a page image (and optionally a label set) into validated,
//! normalized solution upper bounds.
//!
//! # Module Structure
//!
//! - `types`: labels, `BoundaryValue` (0..=1000 scale or -1), engine results
//! - `page`: the encoded page payload
//! - `instruction`: instruction pairs and per-detector configuration
//! - `detect`: the single gateway round-trip every detector uses
//! - `discovery`, `unlabeled`, `labeled`: the three detectors
//! - `fidelity`: caller-side check of requested vs returned labels
//! - `pipeline`: per-page flow and report used by the CLI

pub mod detect;
pub mod discovery;
pub mod error;
pub mod fidelity;
pub mod instruction;
pub mod labeled;
pub mod page;
pub mod pipeline;
pub mod types;
pub mod unlabeled;

pub use discovery::LabelDiscovery;
pub use error::{DetectionError, DetectionResult};
pub use fidelity::{check_label_fidelity, LabelFidelity};
pub use instruction::{DetectionInstruction, DetectorConfig};
pub use labeled::LabeledBoundaryDetector;
pub use page::PageImage;
pub use pipeline::{BoundaryReport, PageError, PageMode, PagePipeline, PageReport};
pub use types::{BoundaryValue, InvalidBoundary, Label, LabelSet, LabeledBoundary};
pub use unlabeled::UnlabeledBoundaryDetector;
