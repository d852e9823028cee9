//! Pure intake transition function.
//!
//! `interpret` turns raw input into either a ready event or a request for a
//! collaborator result; `transition` maps (session, event) to the next stage,
//! the field patch and the reply. Neither touches I/O.

use super::extractor::{
    Command, ConfirmationReply, Extraction, ExtractionFailure, FieldExtractor, Grammar, Payload,
    PriceIdLine,
};
use super::message::TurnInput;
use super::prompts::Prompt;
use super::{ConversationSession, IntakeError, IntakeStage};
use crate::domain::foundation::ImageRef;
use crate::domain::listing::{
    Category, GeneratedListing, Measurements, PricingStrategy, ProductFeatures, Settlement,
    SettlementOutcome,
};

/// Trigger consumed by [`transition`].
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeEvent {
    Image(ImageRef),
    Reset,
    Settle,
    /// Price/id line plus the category the vision collaborator detected.
    PriceId {
        line: PriceIdLine,
        category: Category,
    },
    /// Measurements plus the features the vision collaborator inferred.
    Measurements {
        measurements: Measurements,
        features: ProductFeatures,
    },
    Confirmation(ConfirmationReply),
    SettlementRecorded(SettlementOutcome),
    HandoffSucceeded(GeneratedListing),
    /// A collaborator call failed.
    DownstreamFailed(IntakeError),
    /// Text the stage grammar could not read.
    Rejected(ExtractionFailure),
    /// Text arriving in a stage that expects none.
    Unexpected,
}

/// What the caller must do before a turn can be decided.
#[derive(Debug, Clone, PartialEq)]
pub enum Interpretation {
    Ready(IntakeEvent),
    /// Detect the category from the session's images.
    NeedsCategory(PriceIdLine),
    /// Infer features for the category from the session's images.
    NeedsFeatures {
        category: Category,
        measurements: Measurements,
    },
    /// Record the sale downstream.
    NeedsSettlement(Settlement),
}

/// Field changes carried by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionPatch {
    None,
    AppendImage(ImageRef),
    PriceId {
        line: PriceIdLine,
        category: Category,
    },
    Measurements {
        measurements: Measurements,
        features: ProductFeatures,
    },
    Features(ProductFeatures),
    Strategy {
        features: ProductFeatures,
        strategy: PricingStrategy,
    },
    ClearStrategy,
    /// Drop every cycle field and start a new cycle id.
    Discard,
}

/// Classification of a turn for the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Image stored, no reply.
    Accumulated,
    Advanced,
    Corrected,
    /// Input or collaborator failure; the stage did not advance.
    Rejected(IntakeError),
    /// No edge for this trigger; session unchanged, guidance re-sent.
    Ignored,
    /// Generating committed; the caller runs generation and record handoff.
    StartHandoff,
    /// Cycle finished; the session can be dropped.
    Completed,
    Reset,
}

/// Decision for one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: IntakeStage,
    pub patch: SessionPatch,
    pub outcome: Outcome,
    pub reply: Option<Prompt>,
}

impl Transition {
    fn to(next: IntakeStage, patch: SessionPatch, outcome: Outcome, reply: Option<Prompt>) -> Self {
        Self {
            next,
            patch,
            outcome,
            reply,
        }
    }

    fn stay(session: &ConversationSession, outcome: Outcome, reply: Prompt) -> Self {
        Self::to(session.stage(), SessionPatch::None, outcome, Some(reply))
    }

    /// Whether the turn produces a reply at all.
    pub fn emit_reply(&self) -> bool {
        self.reply.is_some()
    }

    /// True when applying the transition changes nothing but activity time.
    pub fn is_noop(&self, current: IntakeStage) -> bool {
        self.next == current && self.patch == SessionPatch::None
    }
}

/// Reads one input against the session's current stage.
pub fn interpret(
    session: &ConversationSession,
    input: &TurnInput,
    extractor: &FieldExtractor,
) -> Interpretation {
    let text = match input {
        TurnInput::Image(image) => return Interpretation::Ready(IntakeEvent::Image(image.clone())),
        TurnInput::Text(text) => text,
    };

    match extractor.command(text) {
        Some(Command::Reset) => return Interpretation::Ready(IntakeEvent::Reset),
        Some(Command::Settle) => return Interpretation::Ready(IntakeEvent::Settle),
        None => {}
    }

    let Some(grammar) = Grammar::for_stage(session.stage(), session.detected_category()) else {
        return Interpretation::Ready(IntakeEvent::Unexpected);
    };

    match extractor.extract(text, grammar) {
        Extraction::Failure(failure) => Interpretation::Ready(IntakeEvent::Rejected(failure)),
        Extraction::Success(Payload::PriceId(line)) => Interpretation::NeedsCategory(line),
        Extraction::Success(Payload::Measurements(measurements)) => match grammar {
            Grammar::Measurements(category) => Interpretation::NeedsFeatures {
                category,
                measurements,
            },
            _ => Interpretation::Ready(IntakeEvent::Unexpected),
        },
        Extraction::Success(Payload::Settlement(settlement)) => {
            Interpretation::NeedsSettlement(settlement)
        }
        Extraction::Success(Payload::Confirmation(reply)) => {
            Interpretation::Ready(IntakeEvent::Confirmation(reply))
        }
    }
}

/// The single exhaustive transition function.
pub fn transition(session: &ConversationSession, event: IntakeEvent) -> Transition {
    use IntakeStage::*;

    let stage = session.stage();
    let image_count = session.image_refs().len();

    match (stage, event) {
        (_, IntakeEvent::Reset) => Transition::to(
            Idle,
            SessionPatch::Discard,
            Outcome::Reset,
            Some(Prompt::ResetDone),
        ),

        (WaitingSaleInfo, IntakeEvent::Settle) => {
            Transition::stay(session, Outcome::Ignored, Prompt::AskSaleInfo)
        }
        (_, IntakeEvent::Settle) => Transition::to(
            WaitingSaleInfo,
            SessionPatch::Discard,
            Outcome::Advanced,
            Some(Prompt::AskSaleInfo),
        ),

        (Idle, IntakeEvent::Image(image)) => Transition::to(
            Collecting,
            SessionPatch::AppendImage(image),
            Outcome::Accumulated,
            None,
        ),
        (Collecting | WaitingMeasurements, IntakeEvent::Image(image)) => Transition::to(
            stage,
            SessionPatch::AppendImage(image),
            Outcome::Accumulated,
            None,
        ),
        (_, IntakeEvent::Image(_)) => {
            Transition::stay(session, Outcome::Ignored, Prompt::ImagesClosed)
        }

        (Collecting, IntakeEvent::PriceId { line, category }) => Transition::to(
            WaitingMeasurements,
            SessionPatch::PriceId { line, category },
            Outcome::Advanced,
            Some(Prompt::AskMeasurements {
                category,
                image_count,
            }),
        ),

        (
            WaitingMeasurements,
            IntakeEvent::Measurements {
                measurements,
                mut features,
            },
        ) => match session.detected_category() {
            Some(category) if measurements.matches_category(category) => {
                features.category = category;
                features.apply_hints(session.hints(), session.era());
                Transition::to(
                    Confirming,
                    SessionPatch::Measurements {
                        measurements,
                        features: features.clone(),
                    },
                    Outcome::Advanced,
                    Some(Prompt::ConfirmFeatures {
                        features,
                        image_count,
                    }),
                )
            }
            Some(category) => {
                let error = IntakeError::WrongArity {
                    expected: category.arity(),
                    got: measurements.len(),
                };
                Transition::stay(
                    session,
                    Outcome::Rejected(error.clone()),
                    Prompt::failure(error, stage_prompt(session)),
                )
            }
            None => Transition::stay(session, Outcome::Ignored, stage_prompt(session)),
        },

        (Confirming, IntakeEvent::Confirmation(reply)) => {
            let Some(mut features) = session.confirmed_features().cloned() else {
                return Transition::stay(session, Outcome::Ignored, stage_prompt(session));
            };
            for correction in &reply.corrections {
                features.apply_correction(correction);
            }
            match reply.strategy {
                Some(strategy) => Transition::to(
                    Generating,
                    SessionPatch::Strategy { features, strategy },
                    Outcome::StartHandoff,
                    None,
                ),
                None => Transition::to(
                    Confirming,
                    SessionPatch::Features(features.clone()),
                    Outcome::Corrected,
                    Some(Prompt::ConfirmFeatures {
                        features,
                        image_count,
                    }),
                ),
            }
        }

        (WaitingSaleInfo, IntakeEvent::SettlementRecorded(outcome)) => Transition::to(
            Idle,
            SessionPatch::Discard,
            Outcome::Completed,
            Some(Prompt::Settled(outcome)),
        ),

        (Generating, IntakeEvent::HandoffSucceeded(listing)) => Transition::to(
            Idle,
            SessionPatch::Discard,
            Outcome::Completed,
            Some(Prompt::ListingReady {
                management_id: session.management_id().unwrap_or_default().to_string(),
                listing,
            }),
        ),
        (Generating, IntakeEvent::DownstreamFailed(error)) => {
            let retry = match session.confirmed_features() {
                Some(features) => Prompt::ConfirmFeatures {
                    features: features.clone(),
                    image_count,
                },
                None => Prompt::Welcome,
            };
            Transition::to(
                Confirming,
                SessionPatch::ClearStrategy,
                Outcome::Rejected(error.clone()),
                Some(Prompt::failure(error, retry)),
            )
        }

        (_, IntakeEvent::DownstreamFailed(error)) => Transition::stay(
            session,
            Outcome::Rejected(error.clone()),
            Prompt::failure(error, stage_prompt(session)),
        ),

        (
            Collecting | WaitingMeasurements | Confirming | WaitingSaleInfo,
            IntakeEvent::Rejected(failure),
        ) => {
            let error = IntakeError::from(failure);
            Transition::stay(
                session,
                Outcome::Rejected(error.clone()),
                Prompt::failure(error, stage_prompt(session)),
            )
        }

        // Everything else has no edge from the current stage.
        (_, IntakeEvent::Rejected(_))
        | (_, IntakeEvent::Unexpected)
        | (_, IntakeEvent::PriceId { .. })
        | (_, IntakeEvent::Measurements { .. })
        | (_, IntakeEvent::Confirmation(_))
        | (_, IntakeEvent::SettlementRecorded(_))
        | (_, IntakeEvent::HandoffSucceeded(_)) => {
            Transition::stay(session, Outcome::Ignored, stage_prompt(session))
        }
    }
}

/// Prompt that restates what the current stage is waiting for.
pub fn stage_prompt(session: &ConversationSession) -> Prompt {
    let image_count = session.image_refs().len();
    match session.stage() {
        IntakeStage::Idle => Prompt::Welcome,
        IntakeStage::Collecting => Prompt::AskPriceId { image_count },
        IntakeStage::WaitingMeasurements => match session.detected_category() {
            Some(category) => Prompt::AskMeasurements {
                category,
                image_count,
            },
            None => Prompt::AskPriceId { image_count },
        },
        IntakeStage::Confirming => match session.confirmed_features() {
            Some(features) => Prompt::ConfirmFeatures {
                features: features.clone(),
                image_count,
            },
            None => Prompt::Welcome,
        },
        IntakeStage::Generating => Prompt::GenerationInProgress,
        IntakeStage::WaitingSaleInfo => Prompt::AskSaleInfo,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ConversationKey, Timestamp};
    use crate::domain::intake::DownstreamStep;
    use crate::domain::listing::{FeatureCorrection, FeatureField, PriceSuggestion};

    fn key() -> ConversationKey {
        ConversationKey::parse("U-test").unwrap()
    }

    fn image(name: &str) -> ImageRef {
        ImageRef::new(name).unwrap()
    }

    fn line(price: u32, id: &str) -> PriceIdLine {
        PriceIdLine {
            price,
            management_id: id.to_string(),
            era: None,
            hints: Default::default(),
        }
    }

    fn tops() -> Measurements {
        Measurements::for_category(Category::Tops, &[60, 50, 42, 20]).unwrap()
    }

    /// Drives a session through `events`, applying each transition.
    fn drive(events: Vec<IntakeEvent>) -> (ConversationSession, Vec<Transition>) {
        let now = Timestamp::now();
        let mut session = ConversationSession::new(key(), now);
        let mut log = Vec::new();
        for event in events {
            let t = transition(&session, event);
            session.apply(&t, now).unwrap();
            log.push(t);
        }
        (session, log)
    }

    fn confirming() -> ConversationSession {
        drive(vec![
            IntakeEvent::Image(image("a.jpg")),
            IntakeEvent::PriceId {
                line: line(880, "222"),
                category: Category::Tops,
            },
            IntakeEvent::Measurements {
                measurements: tops(),
                features: ProductFeatures::unknown(Category::Tops),
            },
        ])
        .0
    }

    mod images {
        use super::*;

        #[test]
        fn first_image_opens_cycle_silently() {
            let (session, log) = drive(vec![IntakeEvent::Image(image("a.jpg"))]);
            assert_eq!(session.stage(), IntakeStage::Collecting);
            assert_eq!(log[0].outcome, Outcome::Accumulated);
            assert!(!log[0].emit_reply());
        }

        #[test]
        fn images_accumulate_without_replies() {
            let events = (0..5)
                .map(|i| IntakeEvent::Image(image(&format!("{}.jpg", i))))
                .collect();
            let (session, log) = drive(events);
            assert_eq!(session.image_refs().len(), 5);
            assert!(log.iter().all(|t| !t.emit_reply()));
        }

        #[test]
        fn images_rejected_once_confirming() {
            let session = confirming();
            let t = transition(&session, IntakeEvent::Image(image("late.jpg")));
            assert_eq!(t.outcome, Outcome::Ignored);
            assert_eq!(t.patch, SessionPatch::None);
            assert_eq!(t.reply, Some(Prompt::ImagesClosed));
        }
    }

    mod price_id {
        use super::*;

        #[test]
        fn advances_with_single_reply() {
            let (session, log) = drive(vec![
                IntakeEvent::Image(image("a.jpg")),
                IntakeEvent::PriceId {
                    line: line(880, "222"),
                    category: Category::Pants,
                },
            ]);
            assert_eq!(session.stage(), IntakeStage::WaitingMeasurements);
            assert_eq!(session.detected_category(), Some(Category::Pants));
            assert_eq!(
                log[1].reply,
                Some(Prompt::AskMeasurements {
                    category: Category::Pants,
                    image_count: 1
                })
            );
        }

        #[test]
        fn rejected_text_reprompts_same_stage() {
            let (session, _) = drive(vec![IntakeEvent::Image(image("a.jpg"))]);
            let t = transition(
                &session,
                IntakeEvent::Rejected(ExtractionFailure::WrongArity {
                    expected: 2,
                    got: 4,
                }),
            );
            assert_eq!(t.next, IntakeStage::Collecting);
            assert!(t.is_noop(IntakeStage::Collecting));
            assert!(matches!(t.outcome, Outcome::Rejected(IntakeError::WrongArity { .. })));
        }
    }

    mod measurements {
        use super::*;

        #[test]
        fn hints_override_inferred_features() {
            let mut hinted = line(880, "222");
            hinted.hints.size = Some("L".to_string());
            let (session, _) = drive(vec![
                IntakeEvent::Image(image("a.jpg")),
                IntakeEvent::PriceId {
                    line: hinted,
                    category: Category::Tops,
                },
                IntakeEvent::Measurements {
                    measurements: tops(),
                    features: ProductFeatures::unknown(Category::Pants),
                },
            ]);
            let features = session.confirmed_features().unwrap();
            assert_eq!(features.size, "L");
            assert_eq!(features.category, Category::Tops);
        }

        #[test]
        fn mismatched_category_is_wrong_arity() {
            let (session, _) = drive(vec![
                IntakeEvent::Image(image("a.jpg")),
                IntakeEvent::PriceId {
                    line: line(880, "222"),
                    category: Category::Setup,
                },
            ]);
            let t = transition(
                &session,
                IntakeEvent::Measurements {
                    measurements: tops(),
                    features: ProductFeatures::unknown(Category::Setup),
                },
            );
            assert_eq!(
                t.outcome,
                Outcome::Rejected(IntakeError::WrongArity {
                    expected: 8,
                    got: 4
                })
            );
        }
    }

    mod confirming {
        use super::*;

        #[test]
        fn corrections_only_stay_and_merge() {
            let session = confirming();
            let t = transition(
                &session,
                IntakeEvent::Confirmation(ConfirmationReply {
                    corrections: vec![FeatureCorrection::Set(
                        FeatureField::Brand,
                        "adidas".to_string(),
                    )],
                    strategy: None,
                }),
            );
            assert_eq!(t.next, IntakeStage::Confirming);
            assert_eq!(t.outcome, Outcome::Corrected);
            match t.patch {
                SessionPatch::Features(f) => assert_eq!(f.brand, "adidas"),
                other => panic!("unexpected patch {:?}", other),
            }
        }

        #[test]
        fn strategy_starts_handoff_after_corrections() {
            let session = confirming();
            let t = transition(
                &session,
                IntakeEvent::Confirmation(ConfirmationReply {
                    corrections: vec![FeatureCorrection::Set(
                        FeatureField::Color,
                        "ネイビー".to_string(),
                    )],
                    strategy: Some(PricingStrategy::Balanced),
                }),
            );
            assert_eq!(t.next, IntakeStage::Generating);
            assert_eq!(t.outcome, Outcome::StartHandoff);
            assert!(!t.emit_reply());
            match t.patch {
                SessionPatch::Strategy { features, strategy } => {
                    assert_eq!(features.color, "ネイビー");
                    assert_eq!(strategy, PricingStrategy::Balanced);
                }
                other => panic!("unexpected patch {:?}", other),
            }
        }
    }

    mod generating {
        use super::*;

        fn generating() -> ConversationSession {
            let mut session = confirming();
            let t = transition(
                &session,
                IntakeEvent::Confirmation(ConfirmationReply {
                    corrections: vec![],
                    strategy: Some(PricingStrategy::HighProfit),
                }),
            );
            session.apply(&t, Timestamp::now()).unwrap();
            session
        }

        fn listing() -> GeneratedListing {
            GeneratedListing {
                title: "t".to_string(),
                description: "d".to_string(),
                hashtags: vec![],
                price: PriceSuggestion {
                    minimum_price: 1760,
                    start_price: 3170,
                    expected_price: 2640,
                    lowest_acceptable: 2290,
                    strategy: PricingStrategy::HighProfit,
                },
            }
        }

        #[test]
        fn success_completes_cycle() {
            let session = generating();
            let t = transition(&session, IntakeEvent::HandoffSucceeded(listing()));
            assert_eq!(t.next, IntakeStage::Idle);
            assert_eq!(t.outcome, Outcome::Completed);
            assert!(matches!(
                t.reply,
                Some(Prompt::ListingReady { ref management_id, .. }) if management_id == "222"
            ));
        }

        #[test]
        fn failure_rolls_back_to_confirming() {
            let mut session = generating();
            let error = IntakeError::downstream(DownstreamStep::Generation, "down");
            let t = transition(&session, IntakeEvent::DownstreamFailed(error));
            session.apply(&t, Timestamp::now()).unwrap();
            assert_eq!(session.stage(), IntakeStage::Confirming);
            assert_eq!(session.chosen_strategy(), None);
            assert!(session.confirmed_features().is_some());
        }

        #[test]
        fn text_while_generating_is_ignored() {
            let session = generating();
            let t = transition(&session, IntakeEvent::Unexpected);
            assert_eq!(t.reply, Some(Prompt::GenerationInProgress));
            assert!(t.is_noop(IntakeStage::Generating));
        }
    }

    mod commands {
        use super::*;

        #[test]
        fn reset_discards_from_any_stage() {
            let mut session = confirming();
            let t = transition(&session, IntakeEvent::Reset);
            session.apply(&t, Timestamp::now()).unwrap();
            assert_eq!(session.stage(), IntakeStage::Idle);
            assert!(session.image_refs().is_empty());
            assert_eq!(session.purchase_price(), None);
            assert_eq!(session.measurements(), None);
        }

        #[test]
        fn settle_discards_cycle_and_waits_for_sale() {
            let mut session = confirming();
            let t = transition(&session, IntakeEvent::Settle);
            session.apply(&t, Timestamp::now()).unwrap();
            assert_eq!(session.stage(), IntakeStage::WaitingSaleInfo);
            assert_eq!(session.management_id(), None);
        }

        #[test]
        fn settlement_recorded_completes() {
            let (session, _) = drive(vec![IntakeEvent::Settle]);
            let t = transition(
                &session,
                IntakeEvent::SettlementRecorded(SettlementOutcome {
                    management_id: "215".to_string(),
                    sale_price: 3000,
                    shipping_cost: 700,
                    commission: 300,
                    profit: 1120,
                }),
            );
            assert_eq!(t.next, IntakeStage::Idle);
            assert_eq!(t.outcome, Outcome::Completed);
        }
    }

    mod interpretation {
        use super::*;

        #[test]
        fn measurement_line_while_collecting_is_rejected() {
            let (session, _) = drive(vec![IntakeEvent::Image(image("a.jpg"))]);
            let i = interpret(
                &session,
                &TurnInput::Text("60 50 42 20".to_string()),
                &FieldExtractor,
            );
            assert!(matches!(i, Interpretation::Ready(IntakeEvent::Rejected(_))));
        }

        #[test]
        fn price_line_needs_category() {
            let (session, _) = drive(vec![IntakeEvent::Image(image("a.jpg"))]);
            let i = interpret(
                &session,
                &TurnInput::Text("880 222".to_string()),
                &FieldExtractor,
            );
            assert_eq!(i, Interpretation::NeedsCategory(line(880, "222")));
        }

        #[test]
        fn text_while_idle_is_unexpected() {
            let session = ConversationSession::new(key(), Timestamp::now());
            let i = interpret(
                &session,
                &TurnInput::Text("880 222".to_string()),
                &FieldExtractor,
            );
            assert_eq!(i, Interpretation::Ready(IntakeEvent::Unexpected));
        }

        #[test]
        fn commands_win_over_stage_grammar() {
            let session = confirming();
            let i = interpret(&session, &TurnInput::Text("売却".to_string()), &FieldExtractor);
            assert_eq!(i, Interpretation::Ready(IntakeEvent::Settle));
        }
    }
}
