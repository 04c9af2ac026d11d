//! Detection Instructions and Detector Configuration
//!
//! Instruction text, model tier and sampling temperature are explicit
//! configuration handed to each detector, never module-level state.

use serde::{Deserialize, Serialize};

use crate::core::llm::{ChatMessage, ModelTier};

/// The free-text instruction pair controlling the engine's task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionInstruction {
    /// System directive
    pub system: String,
    /// User directive
    pub user: String,
}

impl DetectionInstruction {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Instruction used to enumerate the labels on a page.
    pub fn label_discovery() -> Self {
        Self::new(LABEL_DISCOVERY_SYSTEM, LABEL_DISCOVERY_USER)
    }

    /// Instruction used to locate boundaries without labels.
    pub fn unlabeled_boundaries() -> Self {
        Self::new(UNLABELED_SYSTEM, UNLABELED_USER)
    }

    /// Default instruction for label-conditioned localization.
    pub fn labeled_boundaries() -> Self {
        Self::new(LABELED_SYSTEM, LABELED_USER)
    }

    pub fn is_blank(&self) -> bool {
        self.system.trim().is_empty() && self.user.trim().is_empty()
    }

    /// System and user messages, in that order.
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system.trim()),
            ChatMessage::user(self.user.trim()),
        ]
    }
}

impl Default for DetectionInstruction {
    fn default() -> Self {
        Self::labeled_boundaries()
    }
}

/// Per-detector configuration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub model_tier: ModelTier,
    /// `None` leaves sampling to the engine's default
    pub temperature: Option<f32>,
    pub instruction: DetectionInstruction,
}

impl DetectorConfig {
    /// Enumeration runs on the cheaper tier.
    pub fn label_discovery() -> Self {
        Self {
            model_tier: ModelTier::Fast,
            temperature: None,
            instruction: DetectionInstruction::label_discovery(),
        }
    }

    /// Unlabeled localization feeds cropping, so sampling is pinned to 0.
    pub fn unlabeled_boundaries() -> Self {
        Self {
            model_tier: ModelTier::Fast,
            temperature: Some(0.0),
            instruction: DetectionInstruction::unlabeled_boundaries(),
        }
    }

    /// Label-conditioned localization runs on the stronger tier.
    pub fn labeled_boundaries(instruction: DetectionInstruction) -> Self {
        Self {
            model_tier: ModelTier::Precise,
            temperature: None,
            instruction,
        }
    }

    pub fn with_model_tier(mut self, tier: ModelTier) -> Self {
        self.model_tier = tier;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

// ============================================================================
// Built-in Instruction Text
// ============================================================================

const LABEL_DISCOVERY_SYSTEM: &str = "\
Return the marking of every problem or subproblem in the image as an array of strings.";

const LABEL_DISCOVERY_USER: &str = "\
Detect the marking that denotes each problem or problem part in this image of an assignment.
Markings are usually a number or a letter, found to the left of and near the top of the problem or part.
Problems are usually denoted by a number, sometimes followed by a period or parenthesis (for example \"1\", \"2.\", \"3)\").
Problem parts are usually denoted by a letter, sometimes followed by a period or parenthesis (for example \"a\", \"b.\", \"c)\").
Problem parts may also be denoted by a number and a letter together (for example \"1a\", \"1b\", \"2a\").
Return numbers for problems and number-letter combinations for problem parts (for example \"1a\", \"1b\", \"2\", \"3a\").";

const UNLABELED_SYSTEM: &str = "\
Return the y-axis position at the top of each problem or subproblem solution as an array of integers. Never return masks.";

const UNLABELED_USER: &str = "\
Detect the upper bound of each solution to the problems or subproblems in the image.
Include the problem statement or prompt when placing the upper bound.
If a problem has several parts (for example 1a, 1b, 1c), treat each part as a separate problem and return an upper bound for each.
Problems are usually denoted by a number, sometimes followed by a period or parenthesis (for example \"1\", \"2.\", \"3)\").
Subproblems are usually denoted by a letter, sometimes followed by a period or parenthesis (for example \"a\", \"b.\", \"c)\").
The upper bounds are the y-axis positions at the top of each problem or subproblem solution.";

const LABELED_SYSTEM: &str = "\
Return the y-axis position at the top of each requested problem or subproblem, paired with its identifier. Never return masks.";

const LABELED_USER: &str = "\
Detect the y-coordinate of the upper boundary of each problem in the image, including its problem statement.
For each problem identifier provided, find the upper boundary of the whole problem and return its y-coordinate.
Identifiers may name main problems (\"1\", \"2.\", \"3)\") or parts (\"1a\", \"2b\").
Use -1 for any problem whose boundary cannot be confidently determined or that is not present in the image.
If boundaries are unclear or solutions overlap, use whitespace, horizontal lines or formatting changes to decide, and pick the most visually distinct boundary.
Return exactly one entry for every problem identifier to detect.";
