//! HandleInboundEventHandler - runs one conversation turn.
//!
//! A turn holds the identity's [`TurnGuard`] while it loads the session,
//! resolves any collaborator result the input needs, applies the transition
//! and stores the session. Listing generation is the exception: once the
//! session is committed to `Generating` the guard is released, generation and
//! persistence run unguarded, and the result is applied under a fresh guard
//! only if nothing else touched the session meanwhile.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::foundation::{ConversationKey, Timestamp, ValidationError};
use crate::domain::intake::{
    interpret, stage_prompt, transition, ConversationSession, DownstreamStep, FieldExtractor,
    InboundEvent, IntakeError, IntakeEvent, IntakeStage, Interpretation, Outcome, OutboundReply,
    Prompt,
};
use crate::domain::listing::GeneratedListing;
use crate::ports::{
    CollaboratorError, ListingGenerator, RecordSink, SessionOrigin, SessionStore,
    SessionStoreError, TurnGuard, VisionAnalyzer,
};

/// Failures that prevent a turn from running at all.
///
/// Input and collaborator problems are not errors here; they become a reply.
#[derive(Debug, thiserror::Error)]
pub enum HandleEventError {
    #[error("invalid event: {0}")]
    InvalidEvent(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

/// Handler for inbound chat events.
pub struct HandleInboundEventHandler {
    sessions: Arc<dyn SessionStore>,
    vision: Arc<dyn VisionAnalyzer>,
    generator: Arc<dyn ListingGenerator>,
    records: Arc<dyn RecordSink>,
    extractor: FieldExtractor,
}

impl HandleInboundEventHandler {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        vision: Arc<dyn VisionAnalyzer>,
        generator: Arc<dyn ListingGenerator>,
        records: Arc<dyn RecordSink>,
    ) -> Self {
        Self {
            sessions,
            vision,
            generator,
            records,
            extractor: FieldExtractor,
        }
    }

    pub async fn handle(
        &self,
        event: InboundEvent,
    ) -> Result<Option<OutboundReply>, HandleEventError> {
        self.handle_at(event, Timestamp::now()).await
    }

    /// Runs the turn as if it arrived at `now`.
    pub async fn handle_at(
        &self,
        event: InboundEvent,
        now: Timestamp,
    ) -> Result<Option<OutboundReply>, HandleEventError> {
        let input = event.input()?;
        let key = event.identity;

        let guard = self.sessions.lock(&key).await;
        let lookup = self.sessions.get_or_create(&guard, now).await?;
        match lookup.origin {
            SessionOrigin::Expired => {
                info!(identity = %key, "previous session expired, starting a new one")
            }
            SessionOrigin::Created => debug!(identity = %key, "new session"),
            SessionOrigin::Existing => {}
        }
        let mut session = lookup.session;

        let interpretation = interpret(&session, &input, &self.extractor);
        let intake_event = self.resolve(&session, interpretation, now).await;
        let decided = transition(&session, intake_event);
        debug!(
            identity = %key,
            stage = ?session.stage(),
            next = ?decided.next,
            outcome = ?decided.outcome,
            "turn decided"
        );

        if let Err(error) = session.apply(&decided, now) {
            return self.reject(guard, session, error, now).await;
        }

        match decided.outcome {
            Outcome::StartHandoff => {
                let revision = session.revision();
                self.sessions.put(&guard, session.clone()).await?;
                drop(guard);
                self.complete_handoff(session, revision, now).await
            }
            Outcome::Completed => {
                self.sessions.remove(&guard).await?;
                Ok(reply(&key, decided.reply))
            }
            _ => {
                self.sessions.put(&guard, session).await?;
                Ok(reply(&key, decided.reply))
            }
        }
    }

    /// Fetches whatever collaborator result the interpretation asks for.
    async fn resolve(
        &self,
        session: &ConversationSession,
        interpretation: Interpretation,
        now: Timestamp,
    ) -> IntakeEvent {
        match interpretation {
            Interpretation::Ready(event) => event,
            Interpretation::NeedsCategory(line) => {
                match self.vision.detect_category(session.image_refs()).await {
                    Ok(category) => IntakeEvent::PriceId { line, category },
                    Err(error) => {
                        downstream_failed(session, DownstreamStep::CategoryDetection, error)
                    }
                }
            }
            Interpretation::NeedsFeatures {
                category,
                measurements,
            } => match self
                .vision
                .infer_features(session.image_refs(), category)
                .await
            {
                Ok(features) => IntakeEvent::Measurements {
                    measurements,
                    features,
                },
                Err(error) => downstream_failed(session, DownstreamStep::FeatureInference, error),
            },
            Interpretation::NeedsSettlement(settlement) => {
                match self.records.record_settlement(&settlement, now).await {
                    Ok(outcome) => {
                        info!(
                            identity = %session.id(),
                            management_id = %outcome.management_id,
                            profit = outcome.profit,
                            "settlement recorded"
                        );
                        IntakeEvent::SettlementRecorded(outcome)
                    }
                    Err(error) => downstream_failed(session, DownstreamStep::Settlement, error),
                }
            }
        }
    }

    /// Generates and saves the listing, then applies the result if the
    /// session is still where the handoff left it.
    async fn complete_handoff(
        &self,
        committed: ConversationSession,
        revision: u64,
        confirmed_at: Timestamp,
    ) -> Result<Option<OutboundReply>, HandleEventError> {
        let key = committed.id().clone();
        let result = self.generate_and_save(&committed, confirmed_at).await;

        let guard = self.sessions.lock(&key).await;
        let Some(mut session) = self.sessions.get(&key).await? else {
            debug!(identity = %key, "session gone before handoff completed");
            return Ok(None);
        };
        if session.revision() != revision || session.stage() != IntakeStage::Generating {
            debug!(
                identity = %key,
                expected = revision,
                found = session.revision(),
                "stale handoff result discarded"
            );
            return Ok(None);
        }

        let event = match result {
            Ok(listing) => IntakeEvent::HandoffSucceeded(listing),
            Err(error) => IntakeEvent::DownstreamFailed(error),
        };
        let decided = transition(&session, event);
        let now = Timestamp::now();
        if let Err(error) = session.apply(&decided, now) {
            return self.reject(guard, session, error, now).await;
        }

        if decided.outcome == Outcome::Completed {
            info!(identity = %key, "listing handed off");
            self.sessions.remove(&guard).await?;
        } else {
            self.sessions.put(&guard, session).await?;
        }
        Ok(reply(&key, decided.reply))
    }

    async fn generate_and_save(
        &self,
        session: &ConversationSession,
        saved_at: Timestamp,
    ) -> Result<GeneratedListing, IntakeError> {
        let record = session.to_listing_record()?;

        let listing = self.generator.generate(&record).await.map_err(|error| {
            warn!(identity = %session.id(), error = %error, "listing generation failed");
            IntakeError::downstream(DownstreamStep::Generation, error.to_string())
        })?;

        self.records
            .save_listing(&record, &listing, saved_at)
            .await
            .map_err(|error| {
                warn!(identity = %session.id(), error = %error, "listing save failed");
                IntakeError::downstream(DownstreamStep::ListingSave, error.to_string())
            })?;

        Ok(listing)
    }

    /// Keeps the session as it was and reports the refused transition.
    async fn reject(
        &self,
        guard: TurnGuard,
        mut session: ConversationSession,
        error: IntakeError,
        now: Timestamp,
    ) -> Result<Option<OutboundReply>, HandleEventError> {
        warn!(
            identity = %session.id(),
            stage = ?session.stage(),
            error = %error,
            "transition refused"
        );
        session.touch(now);
        let prompt = Prompt::failure(error, stage_prompt(&session));
        let key = session.id().clone();
        self.sessions.put(&guard, session).await?;
        Ok(reply(&key, Some(prompt)))
    }
}

fn downstream_failed(
    session: &ConversationSession,
    step: DownstreamStep,
    error: CollaboratorError,
) -> IntakeEvent {
    warn!(identity = %session.id(), step = %step, error = %error, "collaborator call failed");
    IntakeEvent::DownstreamFailed(IntakeError::downstream(step, error.to_string()))
}

fn reply(key: &ConversationKey, prompt: Option<Prompt>) -> Option<OutboundReply> {
    prompt.map(|p| OutboundReply::new(key.clone(), p.render()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::generation::TemplateListingGenerator;
    use crate::adapters::records::InMemoryRecordSink;
    use crate::adapters::session::InMemorySessionStore;
    use crate::adapters::vision::MockVisionAnalyzer;
    use crate::domain::listing::{Category, PricingStrategy};

    struct Harness {
        handler: HandleInboundEventHandler,
        store: InMemorySessionStore,
        records: InMemoryRecordSink,
    }

    fn harness(vision: MockVisionAnalyzer) -> Harness {
        let store = InMemorySessionStore::new(chrono::Duration::minutes(30));
        let records = InMemoryRecordSink::default();
        let handler = HandleInboundEventHandler::new(
            Arc::new(store.clone()),
            Arc::new(vision),
            Arc::new(TemplateListingGenerator::default()),
            Arc::new(records.clone()),
        );
        Harness {
            handler,
            store,
            records,
        }
    }

    fn key() -> ConversationKey {
        ConversationKey::parse("U-orchestrator").unwrap()
    }

    fn t(secs: u64) -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000 + secs)
    }

    async fn send_text(h: &Harness, text: &str, at: u64) -> Option<OutboundReply> {
        h.handler
            .handle_at(InboundEvent::text(key(), text), t(at))
            .await
            .unwrap()
    }

    async fn send_image(h: &Harness, name: &str, at: u64) -> Option<OutboundReply> {
        h.handler
            .handle_at(InboundEvent::image(key(), name), t(at))
            .await
            .unwrap()
    }

    async fn stage(h: &Harness) -> Option<IntakeStage> {
        h.store.get(&key()).await.unwrap().map(|s| s.stage())
    }

    mod turns {
        use super::*;

        #[tokio::test]
        async fn images_accumulate_silently() {
            let h = harness(MockVisionAnalyzer::new());

            assert!(send_image(&h, "img-1", 0).await.is_none());
            assert!(send_image(&h, "img-2", 1).await.is_none());

            let session = h.store.get(&key()).await.unwrap().unwrap();
            assert_eq!(session.stage(), IntakeStage::Collecting);
            assert_eq!(session.image_refs().len(), 2);
        }

        #[tokio::test]
        async fn full_cycle_saves_listing_and_drops_session() {
            let h = harness(MockVisionAnalyzer::new().with_category(Category::Tops));

            send_image(&h, "img-1", 0).await;
            send_image(&h, "img-2", 1).await;
            let ask = send_text(&h, "880 222", 2).await.unwrap();
            assert!(ask.text.contains("トップス"));
            let confirm = send_text(&h, "60 50 42 20", 3).await.unwrap();
            assert!(confirm.text.contains("1. ブランド"));
            let done = send_text(&h, "B", 4).await.unwrap();

            assert!(done.text.contains("【生成完了】管理番号 222"));
            assert_eq!(stage(&h).await, None);
            let stored = h.records.get("222").await.unwrap();
            assert_eq!(stored.record.purchase_price, 880);
            assert_eq!(stored.record.strategy, PricingStrategy::Balanced);
            assert_eq!(stored.record.measurements.values(), vec![60, 50, 42, 20]);
            assert_eq!(stored.saved_at, t(4));
        }

        #[tokio::test]
        async fn category_failure_keeps_collecting() {
            let h = harness(
                MockVisionAnalyzer::new()
                    .with_category_error(CollaboratorError::unavailable("vision down")),
            );
            send_image(&h, "img-1", 0).await;

            let reply = send_text(&h, "880 222", 1).await.unwrap();

            assert!(reply.text.contains("カテゴリ判定に失敗しました"));
            assert_eq!(stage(&h).await, Some(IntakeStage::Collecting));
        }

        #[tokio::test]
        async fn generation_failure_returns_to_confirming() {
            let h = harness(MockVisionAnalyzer::new());
            h.records
                .fail_next_save(CollaboratorError::unavailable("sheet locked"));
            send_image(&h, "img-1", 0).await;
            send_text(&h, "880 222", 1).await;
            send_text(&h, "60 50 42 20", 2).await;

            let reply = send_text(&h, "A", 3).await.unwrap();

            assert!(reply.text.contains("商品データの保存に失敗しました"));
            let session = h.store.get(&key()).await.unwrap().unwrap();
            assert_eq!(session.stage(), IntakeStage::Confirming);
            assert_eq!(session.chosen_strategy(), None);
            assert_eq!(session.measurements().unwrap().values(), vec![60, 50, 42, 20]);
        }

        #[tokio::test]
        async fn settlement_records_and_completes() {
            let h = harness(MockVisionAnalyzer::new());
            send_image(&h, "img-1", 0).await;
            send_text(&h, "880 215", 1).await;
            send_text(&h, "60 50 42 20", 2).await;
            send_text(&h, "C", 3).await;

            let ask = send_text(&h, "売却", 10).await.unwrap();
            assert!(ask.text.contains("売却情報を入力してください"));
            let settled = send_text(&h, "215 3000 700", 11).await.unwrap();

            assert!(settled.text.contains("利益: 1,120円"));
            assert_eq!(stage(&h).await, None);
            let sale = h.records.get("215").await.unwrap().sale.unwrap();
            assert_eq!(sale.sold_at, t(11));
        }

        #[tokio::test]
        async fn settlement_for_unknown_id_stays_waiting() {
            let h = harness(MockVisionAnalyzer::new());
            send_text(&h, "売却", 0).await;

            let reply = send_text(&h, "999 3000 700", 1).await.unwrap();

            assert!(reply.text.contains("売却の記録に失敗しました"));
            assert_eq!(stage(&h).await, Some(IntakeStage::WaitingSaleInfo));
        }
    }

    mod expiry {
        use super::*;

        #[tokio::test]
        async fn expired_session_behaves_like_new() {
            let h = harness(MockVisionAnalyzer::new());
            send_image(&h, "img-1", 0).await;

            let reply = send_text(&h, "880 222", 31 * 60).await.unwrap();

            assert!(reply.text.contains("商品画像を送信してから"));
            let session = h.store.get(&key()).await.unwrap().unwrap();
            assert_eq!(session.stage(), IntakeStage::Idle);
            assert!(session.image_refs().is_empty());
        }
    }

    mod validation {
        use super::*;
        use crate::domain::intake::EventKind;

        #[tokio::test]
        async fn empty_image_payload_is_rejected() {
            let h = harness(MockVisionAnalyzer::new());
            let event = InboundEvent {
                identity: key(),
                kind: EventKind::Image,
                payload: String::new(),
            };

            let result = h.handler.handle_at(event, t(0)).await;

            assert!(matches!(result, Err(HandleEventError::InvalidEvent(_))));
            assert_eq!(stage(&h).await, None);
        }
    }
}
