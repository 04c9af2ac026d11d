//! Detection Data Model
//!
//! Labels, normalized boundary values, and the typed engine results each
//! detector expects.

use serde::{Deserialize, Serialize};

use crate::core::llm::schema::{ResponseSchema, StructuredOutput};

// ============================================================================
// Labels
// ============================================================================

/// Identifier of a problem or subproblem marking ("1", "2a", "3)")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Labels in engine order. Never sorted or deduplicated here.
pub type LabelSet = Vec<Label>;

// ============================================================================
// Boundary Values
// ============================================================================

/// A value outside the boundary domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("boundary {0} is outside 0..=1000 and is not the -1 sentinel")]
pub struct InvalidBoundary(pub i64);

/// Normalized vertical position of a solution's upper edge.
///
/// Values live on a 0..=1000 scale measured from the top of the page,
/// independent of the image's pixel height, or are the sentinel `-1`
/// meaning the engine could not confidently locate the label. Nothing else
/// can be constructed or deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub struct BoundaryValue(i32);

impl BoundaryValue {
    /// Upper end of the normalized scale
    pub const SCALE: i32 = 1000;

    /// "Not confidently locatable"
    pub const NOT_FOUND: BoundaryValue = BoundaryValue(-1);

    pub fn new(value: i64) -> Result<Self, InvalidBoundary> {
        match value {
            -1 => Ok(Self::NOT_FOUND),
            v if (0..=Self::SCALE as i64).contains(&v) => Ok(Self(v as i32)),
            v => Err(InvalidBoundary(v)),
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }

    pub fn is_found(self) -> bool {
        self != Self::NOT_FOUND
    }

    /// Absolute pixel row for an image `image_height` pixels tall.
    ///
    /// `floor(boundary / 1000 * image_height)`; `None` for the sentinel.
    pub fn to_pixel(self, image_height: u32) -> Option<u32> {
        if !self.is_found() {
            return None;
        }
        Some((self.0 as u64 * image_height as u64 / Self::SCALE as u64) as u32)
    }

    /// Project a pixel row back onto the normalized scale.
    ///
    /// `None` when the height is zero or the row lies below the image.
    pub fn from_pixel(y: u32, image_height: u32) -> Option<Self> {
        if image_height == 0 || y > image_height {
            return None;
        }
        let scaled = (y as f64 / image_height as f64 * Self::SCALE as f64).round() as i32;
        Some(Self(scaled.min(Self::SCALE)))
    }
}

impl TryFrom<i64> for BoundaryValue {
    type Error = InvalidBoundary;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BoundaryValue> for i32 {
    fn from(value: BoundaryValue) -> Self {
        value.0
    }
}

impl std::fmt::Display for BoundaryValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One label resolved to a boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledBoundary {
    pub solution_number: Label,
    pub upper_bound: BoundaryValue,
}

impl LabeledBoundary {
    pub fn new(label: impl Into<Label>, upper_bound: BoundaryValue) -> Self {
        Self {
            solution_number: label.into(),
            upper_bound,
        }
    }
}

// ============================================================================
// Engine Results
// ============================================================================

/// Labels found on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionNumbers {
    pub solution_numbers: LabelSet,
}

impl StructuredOutput for SolutionNumbers {
    fn schema() -> ResponseSchema {
        ResponseSchema::object([(
            "solution_numbers",
            ResponseSchema::array_of(ResponseSchema::string()),
        )])
    }
}

/// Boundaries with no label association, top to bottom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionUpperBounds {
    pub upper_bounds: Vec<BoundaryValue>,
}

impl StructuredOutput for SolutionUpperBounds {
    fn schema() -> ResponseSchema {
        ResponseSchema::object([(
            "upper_bounds",
            ResponseSchema::array_of(ResponseSchema::integer()),
        )])
    }
}

/// Boundaries paired with the label they belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberedSolutionUpperBounds {
    pub upper_bounds: Vec<LabeledBoundary>,
}

impl StructuredOutput for NumberedSolutionUpperBounds {
    fn schema() -> ResponseSchema {
        ResponseSchema::object([(
            "upper_bounds",
            ResponseSchema::array_of(ResponseSchema::object([
                ("solution_number", ResponseSchema::string()),
                ("upper_bound", ResponseSchema::integer()),
            ])),
        )])
    }
}
