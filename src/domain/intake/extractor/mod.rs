//! Stage-aware field extractor.
//!
//! Text is normalized (full-width folding) and then parsed
//! by exactly one grammar, chosen from the session's stage. Commands are the
//! only thing recognized regardless of stage.
//!
//! Extraction never fails with an error: malformed input becomes an
//! [`ExtractionFailure`] the caller can turn into guidance.

mod grammar;
mod normalize;
mod rules;

pub use normalize::{fold_width, grouped_reading, normalize};
pub use rules::{RuleTable, FREE_SIZE, RULES_V1};

use serde::{Deserialize, Serialize};

use super::{IntakeError, IntakeStage};
use crate::domain::listing::{
    Category, EraTag, FeatureCorrection, FeatureHints, Measurements, PricingStrategy, Settlement,
};
use rules::RULES;

/// Grammar applied to a text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    PriceId,
    Measurements(Category),
    Settlement,
    Confirmation,
}

impl Grammar {
    /// Grammar expected in a stage; `None` where no text is expected.
    pub fn for_stage(stage: IntakeStage, category: Option<Category>) -> Option<Self> {
        match stage {
            IntakeStage::Collecting => Some(Grammar::PriceId),
            IntakeStage::WaitingMeasurements => category.map(Grammar::Measurements),
            IntakeStage::Confirming => Some(Grammar::Confirmation),
            IntakeStage::WaitingSaleInfo => Some(Grammar::Settlement),
            IntakeStage::Idle | IntakeStage::Generating => None,
        }
    }
}

/// Stage-independent commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Reset,
    Settle,
}

/// Purchase price, management id and the optional extras typed alongside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceIdLine {
    pub price: u32,
    pub management_id: String,
    pub era: Option<EraTag>,
    pub hints: FeatureHints,
}

/// Operator reply to the feature summary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfirmationReply {
    pub corrections: Vec<FeatureCorrection>,
    pub strategy: Option<PricingStrategy>,
}

/// Successfully extracted values, tagged by grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    PriceId(PriceIdLine),
    Measurements(Measurements),
    Settlement(Settlement),
    Confirmation(ConfirmationReply),
}

/// Why a message could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionFailure {
    /// Readable but conflicting or incomplete; the reason is operator-facing.
    Ambiguous(String),
    WrongArity { expected: usize, got: usize },
    Unrecognized,
}

impl ExtractionFailure {
    pub fn ambiguous(reason: impl Into<String>) -> Self {
        ExtractionFailure::Ambiguous(reason.into())
    }
}

impl From<ExtractionFailure> for IntakeError {
    fn from(failure: ExtractionFailure) -> Self {
        match failure {
            ExtractionFailure::Ambiguous(reason) => IntakeError::Ambiguous { reason },
            ExtractionFailure::WrongArity { expected, got } => {
                IntakeError::WrongArity { expected, got }
            }
            ExtractionFailure::Unrecognized => IntakeError::Unrecognized,
        }
    }
}

/// Result of running one grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Success(Payload),
    Failure(ExtractionFailure),
}

impl From<ExtractionFailure> for Extraction {
    fn from(failure: ExtractionFailure) -> Self {
        Extraction::Failure(failure)
    }
}

impl Extraction {
    pub fn is_success(&self) -> bool {
        matches!(self, Extraction::Success(_))
    }
}

/// Entry point for all text parsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldExtractor;

impl FieldExtractor {
    /// Version of the rule table in use.
    pub fn rules_version(&self) -> u32 {
        RULES.table.version
    }

    /// Recognizes a whole-message command.
    pub fn command(&self, text: &str) -> Option<Command> {
        let text = normalize(text);
        if RULES.is_reset(&text) {
            Some(Command::Reset)
        } else if RULES.is_settle(&text) {
            Some(Command::Settle)
        } else {
            None
        }
    }

    /// Parses `text` with one grammar.
    ///
    /// Commas separate fields. Only when that reading has the wrong number
    /// of values is the text re-read with `1,200` style grouping, and the
    /// second reading is kept only if it succeeds.
    pub fn extract(&self, text: &str, grammar: Grammar) -> Extraction {
        let text = normalize(text);
        let first = Self::run(&text, grammar);
        if !matches!(first, Extraction::Failure(ExtractionFailure::WrongArity { .. })) {
            return first;
        }
        match grouped_reading(&text).map(|grouped| Self::run(&grouped, grammar)) {
            Some(second) if second.is_success() => second,
            _ => first,
        }
    }

    fn run(text: &str, grammar: Grammar) -> Extraction {
        match grammar {
            Grammar::PriceId => grammar::price_id(text),
            Grammar::Measurements(category) => grammar::measurements(text, category),
            Grammar::Settlement => grammar::settlement(text),
            Grammar::Confirmation => grammar::confirmation(text),
        }
    }
}
