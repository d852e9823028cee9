//! Conversation session aggregate.
//!
//! One session per conversation identity, holding the partial progress of
//! the current intake cycle.
//!
//! # Invariants
//!
//! - `stage` only changes along edges of [`IntakeStage`]'s state machine
//! - `image_refs` only grows while the stage is `Collecting` or
//!   `WaitingMeasurements`
//! - `measurements`, when present, match `detected_category` exactly
//! - `revision` increases on every applied change

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::transition::{SessionPatch, Transition};
use super::{IntakeError, IntakeStage};
use crate::domain::foundation::{ConversationKey, CycleId, ImageRef, StateMachine, Timestamp};
use crate::domain::listing::{
    Category, EraTag, FeatureHints, ListingRecord, Measurements, PricingStrategy, ProductFeatures,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSession {
    id: ConversationKey,
    cycle_id: CycleId,
    stage: IntakeStage,
    image_refs: Vec<ImageRef>,
    purchase_price: Option<u32>,
    management_id: Option<String>,
    era: Option<EraTag>,
    hints: FeatureHints,
    detected_category: Option<Category>,
    measurements: Option<Measurements>,
    confirmed_features: Option<ProductFeatures>,
    chosen_strategy: Option<PricingStrategy>,
    created_at: Timestamp,
    last_activity_at: Timestamp,
    revision: u64,
}

impl ConversationSession {
    /// Fresh idle session.
    pub fn new(id: ConversationKey, now: Timestamp) -> Self {
        Self {
            id,
            cycle_id: CycleId::new(),
            stage: IntakeStage::Idle,
            image_refs: Vec::new(),
            purchase_price: None,
            management_id: None,
            era: None,
            hints: FeatureHints::default(),
            detected_category: None,
            measurements: None,
            confirmed_features: None,
            chosen_strategy: None,
            created_at: now,
            last_activity_at: now,
            revision: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &ConversationKey {
        &self.id
    }

    pub fn cycle_id(&self) -> CycleId {
        self.cycle_id
    }

    pub fn stage(&self) -> IntakeStage {
        self.stage
    }

    pub fn image_refs(&self) -> &[ImageRef] {
        &self.image_refs
    }

    pub fn purchase_price(&self) -> Option<u32> {
        self.purchase_price
    }

    pub fn management_id(&self) -> Option<&str> {
        self.management_id.as_deref()
    }

    pub fn era(&self) -> Option<&EraTag> {
        self.era.as_ref()
    }

    pub fn hints(&self) -> &FeatureHints {
        &self.hints
    }

    pub fn detected_category(&self) -> Option<Category> {
        self.detected_category
    }

    pub fn measurements(&self) -> Option<&Measurements> {
        self.measurements.as_ref()
    }

    pub fn confirmed_features(&self) -> Option<&ProductFeatures> {
        self.confirmed_features.as_ref()
    }

    pub fn chosen_strategy(&self) -> Option<PricingStrategy> {
        self.chosen_strategy
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn last_activity_at(&self) -> Timestamp {
        self.last_activity_at
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// True once `timeout` has passed since the last activity.
    pub fn is_expired(&self, now: Timestamp, timeout: Duration) -> bool {
        self.last_activity_at.plus(timeout).is_before(&now)
    }

    /// Records activity without changing any field.
    pub fn touch(&mut self, now: Timestamp) {
        self.last_activity_at = now;
    }

    /// Applies a transition atomically: either every change lands or none.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if the stage edge does not exist, or an image is
    ///   appended outside the collecting stages
    /// - `WrongArity` if measurements do not match the detected category
    /// - `IncompleteRecord` if measurements arrive before a category
    pub fn apply(&mut self, transition: &Transition, now: Timestamp) -> Result<(), IntakeError> {
        if transition.is_noop(self.stage) {
            self.touch(now);
            return Ok(());
        }
        self.check(transition)?;

        match &transition.patch {
            SessionPatch::None => {}
            SessionPatch::AppendImage(image) => self.image_refs.push(image.clone()),
            SessionPatch::PriceId { line, category } => {
                self.purchase_price = Some(line.price);
                self.management_id = Some(line.management_id.clone());
                self.era = line.era.clone();
                self.hints = line.hints.clone();
                self.detected_category = Some(*category);
            }
            SessionPatch::Measurements {
                measurements,
                features,
            } => {
                self.measurements = Some(measurements.clone());
                self.confirmed_features = Some(features.clone());
            }
            SessionPatch::Features(features) => {
                self.confirmed_features = Some(features.clone());
            }
            SessionPatch::Strategy { features, strategy } => {
                self.confirmed_features = Some(features.clone());
                self.chosen_strategy = Some(*strategy);
            }
            SessionPatch::ClearStrategy => self.chosen_strategy = None,
            SessionPatch::Discard => self.discard_cycle(),
        }

        self.stage = transition.next;
        self.last_activity_at = now;
        self.revision += 1;
        Ok(())
    }

    fn check(&self, transition: &Transition) -> Result<(), IntakeError> {
        let invalid = || IntakeError::InvalidTransition {
            from: self.stage,
            to: transition.next,
        };

        self.stage
            .transition_to(transition.next)
            .map_err(|_| invalid())?;

        match &transition.patch {
            SessionPatch::AppendImage(_) if !transition.next.holds_images() => Err(invalid()),
            SessionPatch::Measurements { measurements, .. } => {
                let category = self
                    .detected_category
                    .ok_or(IntakeError::IncompleteRecord("category"))?;
                if measurements.matches_category(category) {
                    Ok(())
                } else {
                    Err(IntakeError::WrongArity {
                        expected: category.arity(),
                        got: measurements.len(),
                    })
                }
            }
            _ => Ok(()),
        }
    }

    fn discard_cycle(&mut self) {
        self.cycle_id = CycleId::new();
        self.image_refs.clear();
        self.purchase_price = None;
        self.management_id = None;
        self.era = None;
        self.hints = FeatureHints::default();
        self.detected_category = None;
        self.measurements = None;
        self.confirmed_features = None;
        self.chosen_strategy = None;
    }

    /// Flattens the cycle into the record handed downstream.
    ///
    /// # Errors
    ///
    /// `IncompleteRecord` naming the first missing field.
    pub fn to_listing_record(&self) -> Result<ListingRecord, IntakeError> {
        Ok(ListingRecord {
            cycle_id: self.cycle_id,
            conversation: self.id.clone(),
            management_id: self
                .management_id
                .clone()
                .ok_or(IntakeError::IncompleteRecord("management_id"))?,
            purchase_price: self
                .purchase_price
                .ok_or(IntakeError::IncompleteRecord("purchase_price"))?,
            era: self.era.clone(),
            category: self
                .detected_category
                .ok_or(IntakeError::IncompleteRecord("category"))?,
            measurements: self
                .measurements
                .clone()
                .ok_or(IntakeError::IncompleteRecord("measurements"))?,
            features: self
                .confirmed_features
                .clone()
                .ok_or(IntakeError::IncompleteRecord("features"))?,
            strategy: self
                .chosen_strategy
                .ok_or(IntakeError::IncompleteRecord("strategy"))?,
            image_refs: self.image_refs.clone(),
        })
    }
}
