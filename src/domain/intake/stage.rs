//! Intake stage machine.
//!
//! Each stage names what the conversation is waiting for and therefore which
//! grammar the extractor applies to the next text message.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Position of a conversation in the intake flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStage {
    /// No cycle in progress.
    #[default]
    Idle,

    /// Receiving images, waiting for the price/id line.
    Collecting,

    /// Category known, waiting for the measurement line.
    WaitingMeasurements,

    /// Features shown, waiting for corrections or a strategy.
    Confirming,

    /// Generation and record handoff in flight.
    Generating,

    /// Settlement sub-flow: waiting for id, sale price and shipping cost.
    WaitingSaleInfo,
}

impl IntakeStage {
    /// Stages in which image events extend the current cycle.
    pub fn accepts_images(&self) -> bool {
        matches!(
            self,
            Self::Idle | Self::Collecting | Self::WaitingMeasurements
        )
    }

    /// Stages in which the image list may be non-empty and still growing.
    pub fn holds_images(&self) -> bool {
        matches!(self, Self::Collecting | Self::WaitingMeasurements)
    }
}

impl StateMachine for IntakeStage {
    fn can_transition_to(&self, target: &Self) -> bool {
        use IntakeStage::*;
        matches!(
            (self, target),
            // First image opens a cycle
            (Idle, Collecting) |
            (Collecting, WaitingMeasurements) |
            (WaitingMeasurements, Confirming) |
            (Confirming, Generating) |
            // Handoff finished, or rolled back for a retry
            (Generating, Idle) |
            (Generating, Confirming) |
            (WaitingSaleInfo, Idle) |
            // Reset
            (Collecting, Idle) |
            (WaitingMeasurements, Idle) |
            (Confirming, Idle) |
            // Settle trigger from anywhere else
            (Idle, WaitingSaleInfo) |
            (Collecting, WaitingSaleInfo) |
            (WaitingMeasurements, WaitingSaleInfo) |
            (Confirming, WaitingSaleInfo) |
            (Generating, WaitingSaleInfo)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use IntakeStage::*;
        match self {
            Idle => vec![Collecting, WaitingSaleInfo],
            Collecting => vec![WaitingMeasurements, Idle, WaitingSaleInfo],
            WaitingMeasurements => vec![Confirming, Idle, WaitingSaleInfo],
            Confirming => vec![Generating, Idle, WaitingSaleInfo],
            Generating => vec![Idle, Confirming, WaitingSaleInfo],
            WaitingSaleInfo => vec![Idle],
        }
    }
}
