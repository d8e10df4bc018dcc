//! The session store: single owner of all mutable client state.
//!
//! The store holds the current [`DebateSession`], the branch forest and the
//! fork draft, and the live [`StreamTransport`] when the session is running.
//! All mutation funnels through [`dispatch`](SessionStore::dispatch), which
//! runs actions through the transition table and keeps the transport in sync:
//! started iff the session is `Running`, torn down whenever it leaves
//! `Running` for any reason.
//!
//! The host drains the event receiver returned by [`SessionStore::new`] and
//! feeds each event to [`apply_stream_event`](SessionStore::apply_stream_event);
//! transport delivery and direct calls therefore interleave on one task and
//! never run concurrently against the store.

use crate::ports::push_channel::ChannelConnector;
use crate::transport::{StreamTransport, TransportConfig};
use parley_domain::{
    ApiError, Branch, BranchForest, BranchId, ConfigDraft, ConsensusResult, DebateConfig,
    DebateSession, ForkDraft, ForkMode, SessionAction, StreamEvent, Turn, TurnId,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// What external observers should show about the push connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// No transport running.
    #[default]
    Idle,
    /// Transport running and healthy.
    Streaming,
    /// Transport running but currently retrying a lost connection.
    Reconnecting,
}

/// The mutable holder tying the state machine, the branch model and the
/// transport together.
pub struct SessionStore<C: ChannelConnector> {
    session: DebateSession,
    forest: BranchForest,
    fork_draft: Option<ForkDraft>,
    status: ConnectionStatus,
    default_fork_mode: ForkMode,
    connector: Arc<C>,
    transport_config: TransportConfig,
    transport: Option<StreamTransport>,
    events_tx: mpsc::UnboundedSender<StreamEvent>,
}

impl<C: ChannelConnector> SessionStore<C> {
    /// Create a store plus the receiver the host loop drains; every event
    /// received there must be handed to [`apply_stream_event`](Self::apply_stream_event).
    pub fn new(
        connector: Arc<C>,
        transport_config: TransportConfig,
    ) -> (Self, mpsc::UnboundedReceiver<StreamEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let store = Self {
            session: DebateSession::Idle,
            forest: BranchForest::new(),
            fork_draft: None,
            status: ConnectionStatus::Idle,
            default_fork_mode: ForkMode::default(),
            connector,
            transport_config,
            transport: None,
            events_tx,
        };
        (store, events_rx)
    }

    // === Session actions ===

    /// Run `action` through the transition table. Returns whether the
    /// transition was legal; illegal actions leave everything untouched.
    pub fn dispatch(&mut self, action: SessionAction) -> bool {
        if !self.session.can_apply(&action) {
            debug!(
                state = self.session.name(),
                action = action.name(),
                "rejecting illegal session action"
            );
            return false;
        }
        debug!(
            state = self.session.name(),
            action = action.name(),
            "applying session action"
        );
        let current = std::mem::take(&mut self.session);
        self.session = current.apply(action);
        self.sync_transport();
        true
    }

    /// Freeze the current draft and dispatch `StartDebate`.
    ///
    /// Returns the validation failure without transitioning when the draft
    /// is incomplete or out of bounds. In states where starting is illegal
    /// this is a no-op, like any other illegal action.
    pub fn start_debate(&mut self) -> Result<(), ApiError> {
        let draft = match &self.session {
            DebateSession::Configuring { draft } => draft.clone(),
            DebateSession::Idle => ConfigDraft::default(),
            _ => return Ok(()), // dispatch would reject it as illegal anyway
        };
        let config = DebateConfig::from_draft(&draft)?;
        self.default_fork_mode = config.fork_mode;
        self.dispatch(SessionAction::StartDebate(config));
        Ok(())
    }

    /// Merge a partial config into the draft.
    pub fn update_config(&mut self, update: ConfigDraft) -> bool {
        self.dispatch(SessionAction::UpdateConfig(update))
    }

    /// Return to `Idle` and clear the branch forest, the fork draft and the
    /// connection status. No-op in states that do not accept `Reset`.
    pub fn reset(&mut self) -> bool {
        let applied = self.dispatch(SessionAction::Reset);
        if applied {
            self.forest.clear();
            self.fork_draft = None;
            self.default_fork_mode = ForkMode::default();
            self.status = ConnectionStatus::Idle;
        }
        applied
    }

    // === Transport events ===

    /// Interpret one classified transport event.
    pub fn apply_stream_event(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Turn(turn) => {
                // Events may still be buffered after the transport is gone
                // (e.g. right after a pause); those must not revive the status.
                if self.transport.is_some() {
                    self.status = ConnectionStatus::Streaming;
                }
                self.dispatch(SessionAction::ReceiveTurn(turn));
            }
            StreamEvent::Consensus(consensus) => {
                if self.transport.is_some() {
                    self.status = ConnectionStatus::Streaming;
                }
                self.dispatch(SessionAction::DebateComplete(consensus));
            }
            StreamEvent::Complete { debate_id } => {
                // The session is already completed or completing; just stop
                // listening.
                debug!(%debate_id, "server finished the stream");
                self.close_transport();
            }
            StreamEvent::Error {
                message,
                recoverable: true,
            } => {
                // The transport is already retrying; only the status changes.
                info!(%message, "push channel reconnecting");
                self.status = ConnectionStatus::Reconnecting;
            }
            StreamEvent::Error {
                message,
                recoverable: false,
            } => {
                warn!(%message, "push channel failed for good");
                self.dispatch(SessionAction::Fail {
                    error: ApiError::network(message),
                    recoverable: false,
                });
            }
        }
    }

    /// Force an immediate reconnect of the live transport, if any.
    pub fn reconnect(&self) {
        if let Some(transport) = &self.transport {
            transport.reconnect();
        }
    }

    // === Branch & fork operations ===

    /// Insert the server's authoritative branch record.
    pub fn add_branch(&mut self, branch: Branch) {
        self.forest.add_branch(branch);
    }

    /// Move the active-branch pointer (weak reference; may dangle).
    pub fn select_branch(&mut self, id: Option<BranchId>) {
        self.forest.select_branch(id);
    }

    /// Begin drafting a fork off `turn_id` on `branch_id`, discarding any
    /// draft already in progress.
    pub fn start_fork(&mut self, turn_id: TurnId, branch_id: BranchId) {
        self.fork_draft = Some(ForkDraft::new(turn_id, branch_id, self.default_fork_mode));
    }

    /// Replace the draft's content. No-op when no draft exists.
    pub fn update_fork_draft(&mut self, content: impl Into<String>) {
        if let Some(draft) = &mut self.fork_draft {
            draft.content = content.into();
        }
    }

    /// Drop the draft unconditionally.
    pub fn cancel_fork(&mut self) {
        self.fork_draft = None;
    }

    /// Take the draft for submission. Branch creation is the caller's next
    /// step, via the one-shot API and [`add_branch`](Self::add_branch).
    pub fn complete_fork(&mut self) -> Option<ForkDraft> {
        self.fork_draft.take()
    }

    // === Selectors ===

    pub fn session(&self) -> &DebateSession {
        &self.session
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    pub fn turns(&self) -> &[Turn] {
        self.session.turns()
    }

    pub fn consensus(&self) -> Option<&ConsensusResult> {
        self.session.consensus()
    }

    pub fn branches(&self) -> &BranchForest {
        &self.forest
    }

    pub fn active_branch(&self) -> Option<&Branch> {
        self.forest.active_branch()
    }

    pub fn fork_draft(&self) -> Option<&ForkDraft> {
        self.fork_draft.as_ref()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.status
    }

    // === Transport lifecycle ===

    fn sync_transport(&mut self) {
        match &self.session {
            DebateSession::Running { debate_id, .. } => {
                if self.transport.is_none() {
                    info!(%debate_id, "starting stream transport");
                    self.transport = Some(StreamTransport::spawn(
                        self.connector.clone(),
                        debate_id.clone(),
                        self.transport_config.clone(),
                        self.events_tx.clone(),
                    ));
                    self.status = ConnectionStatus::Streaming;
                }
            }
            _ => self.close_transport(),
        }
    }

    fn close_transport(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            debug!("closing stream transport");
            transport.close();
            self.status = ConnectionStatus::Idle;
        }
    }
}

impl<C: ChannelConnector> Drop for SessionStore<C> {
    fn drop(&mut self) {
        self.close_transport();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Connect, ScriptedConnector, Step};
    use parley_domain::{ConsensusLevel, DebateId, ParticipantType};

    fn draft() -> ConfigDraft {
        ConfigDraft {
            question: Some("Is remote work better?".into()),
            participants: Some(vec!["a".into(), "b".into()]),
            ..ConfigDraft::default()
        }
    }

    fn store() -> (SessionStore<ScriptedConnector>, mpsc::UnboundedReceiver<StreamEvent>) {
        let connector = Arc::new(ScriptedConnector::single_channel(vec![Step::Hold]));
        SessionStore::new(connector, TransportConfig::default())
    }

    fn store_with(
        connector: Arc<ScriptedConnector>,
    ) -> (SessionStore<ScriptedConnector>, mpsc::UnboundedReceiver<StreamEvent>) {
        SessionStore::new(connector, TransportConfig::default())
    }

    fn running_store() -> (SessionStore<ScriptedConnector>, mpsc::UnboundedReceiver<StreamEvent>) {
        let (mut store, rx) = store();
        store.update_config(draft());
        store.start_debate().unwrap();
        store.dispatch(SessionAction::DebateStarted(DebateId::new("d1")));
        (store, rx)
    }

    fn turn(n: u32) -> Turn {
        Turn {
            turn_id: TurnId::new(format!("t-{n}")),
            branch_id: BranchId::new("b-root"),
            participant_id: "a".into(),
            participant_type: ParticipantType::Model,
            content: format!("argument {n}"),
            confidence: None,
            tokens_used: 150,
            cost_usd: 0.001,
            latency_ms: 200,
            created_at: chrono::Utc::now(),
        }
    }

    fn consensus(percentage: f64) -> ConsensusResult {
        ConsensusResult {
            level: ConsensusLevel::Strong,
            percentage,
            supporting: 2,
            dissenting: 0,
            confidence: 0.8,
        }
    }

    fn root_branch() -> Branch {
        Branch::root(BranchId::new("b-root"), "main", ForkMode::Save)
    }

    #[tokio::test]
    async fn configure_start_acknowledge_reaches_running() {
        let (store, _rx) = running_store();
        assert_eq!(
            *store.session(),
            DebateSession::Running {
                debate_id: DebateId::new("d1"),
                current_round: 1,
                turns: vec![],
            }
        );
        assert_eq!(store.connection_status(), ConnectionStatus::Streaming);
    }

    #[tokio::test]
    async fn transport_starts_only_when_running() {
        let connector = Arc::new(ScriptedConnector::single_channel(vec![Step::Hold]));
        let (mut store, _rx) = store_with(connector.clone());

        store.update_config(draft());
        store.start_debate().unwrap();
        tokio::task::yield_now().await;
        assert_eq!(connector.connect_count(), 0, "not yet running");

        store.dispatch(SessionAction::DebateStarted(DebateId::new("d1")));
        tokio::task::yield_now().await;
        assert_eq!(connector.connect_count(), 1);
    }

    #[tokio::test]
    async fn invalid_draft_fails_start_without_transition() {
        let (mut store, _rx) = store();
        store.update_config(ConfigDraft {
            question: Some("short".into()),
            ..ConfigDraft::default()
        });
        let err = store.start_debate().unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
        assert_eq!(store.session().name(), "configuring");
    }

    #[tokio::test]
    async fn turn_then_consensus_completes_with_history() {
        let (mut store, _rx) = running_store();

        let first = turn(1);
        store.apply_stream_event(StreamEvent::Turn(first.clone()));
        store.apply_stream_event(StreamEvent::Consensus(consensus(0.9)));

        let DebateSession::Completed {
            turns, consensus, ..
        } = store.session()
        else {
            panic!("expected completed, got {}", store.session().name());
        };
        assert_eq!(turns.as_slice(), std::slice::from_ref(&first));
        assert_eq!(consensus.percentage, 0.9);
    }

    #[tokio::test]
    async fn completion_tears_down_the_transport() {
        let (mut store, _rx) = running_store();
        store.apply_stream_event(StreamEvent::Consensus(consensus(0.9)));
        assert!(store.transport.is_none());
        assert_eq!(store.connection_status(), ConnectionStatus::Idle);
    }

    #[tokio::test]
    async fn pause_tears_down_and_resume_restarts_the_transport() {
        let connector = Arc::new(ScriptedConnector::with_script(vec![
            Connect::Channel(vec![Step::Hold]),
            Connect::Channel(vec![Step::Hold]),
        ]));
        let (mut store, _rx) = store_with(connector.clone());
        store.update_config(draft());
        store.start_debate().unwrap();
        store.dispatch(SessionAction::DebateStarted(DebateId::new("d1")));
        tokio::task::yield_now().await;
        assert_eq!(connector.connect_count(), 1);

        store.dispatch(SessionAction::PauseDebate {
            reason: "coffee".into(),
        });
        assert!(store.transport.is_none());

        store.dispatch(SessionAction::ResumeDebate);
        tokio::task::yield_now().await;
        assert_eq!(connector.connect_count(), 2, "fresh transport after resume");
    }

    #[tokio::test]
    async fn recoverable_error_only_surfaces_reconnecting_status() {
        let (mut store, _rx) = running_store();
        let before = store.session().clone();

        store.apply_stream_event(StreamEvent::Error {
            message: "blip".into(),
            recoverable: true,
        });

        assert_eq!(*store.session(), before, "session state must be untouched");
        assert_eq!(store.connection_status(), ConnectionStatus::Reconnecting);
        assert!(store.transport.is_some(), "transport keeps retrying");
    }

    #[tokio::test]
    async fn unrecoverable_error_moves_session_to_error() {
        let (mut store, _rx) = running_store();
        store.apply_stream_event(StreamEvent::Error {
            message: "gone".into(),
            recoverable: false,
        });

        let DebateSession::Error { error, recoverable } = store.session() else {
            panic!("expected error state");
        };
        assert!(!recoverable);
        assert_eq!(*error, ApiError::network("gone"));
        assert!(store.transport.is_none());
    }

    #[tokio::test]
    async fn complete_event_closes_transport_without_touching_the_session() {
        let (mut store, _rx) = running_store();
        store.apply_stream_event(StreamEvent::Complete {
            debate_id: DebateId::new("d1"),
        });
        assert!(store.is_running(), "complete alone does not transition");
        assert!(store.transport.is_none());
        assert_eq!(store.connection_status(), ConnectionStatus::Idle);
    }

    #[tokio::test]
    async fn buffered_events_after_pause_do_not_revive_the_status() {
        let (mut store, _rx) = running_store();
        store.dispatch(SessionAction::PauseDebate {
            reason: "coffee".into(),
        });
        assert_eq!(store.connection_status(), ConnectionStatus::Idle);
        let paused = store.session().clone();

        // Events that were already queued when the transport went down.
        store.apply_stream_event(StreamEvent::Turn(turn(1)));
        store.apply_stream_event(StreamEvent::Consensus(consensus(0.9)));

        assert_eq!(*store.session(), paused, "paused session must be untouched");
        assert_eq!(
            store.connection_status(),
            ConnectionStatus::Idle,
            "no transport is alive, so nothing is streaming"
        );
    }

    #[tokio::test]
    async fn reset_clears_branches_draft_and_status() {
        let (mut store, _rx) = running_store();
        store.add_branch(root_branch());
        store.start_fork(TurnId::new("t-1"), BranchId::new("b-root"));

        // Running does not accept Reset; pause first.
        store.dispatch(SessionAction::PauseDebate {
            reason: "stop".into(),
        });
        assert!(store.reset());

        assert_eq!(*store.session(), DebateSession::Idle);
        assert!(store.branches().is_empty());
        assert!(store.fork_draft().is_none());
        assert_eq!(store.connection_status(), ConnectionStatus::Idle);
    }

    #[tokio::test]
    async fn starting_a_fork_discards_the_previous_draft() {
        let (mut store, _rx) = running_store();
        store.start_fork(TurnId::new("t-1"), BranchId::new("b-root"));
        store.update_fork_draft("half-written thought");

        store.start_fork(TurnId::new("t-2"), BranchId::new("b-root"));
        let draft = store.fork_draft().unwrap();
        assert_eq!(draft.content, "", "old content must not leak into the new draft");
        assert_eq!(draft.parent_turn_id, TurnId::new("t-2"));
    }

    #[tokio::test]
    async fn fork_draft_lifecycle() {
        let (mut store, _rx) = running_store();

        store.update_fork_draft("ignored"); // no draft yet: no-op
        assert!(store.fork_draft().is_none());

        store.start_fork(TurnId::new("t-1"), BranchId::new("b-root"));
        store.update_fork_draft("what if we assumed the opposite?");
        let taken = store.complete_fork().unwrap();
        assert_eq!(taken.content, "what if we assumed the opposite?");
        assert!(store.fork_draft().is_none(), "complete clears the draft");
        assert!(
            store.branches().is_empty(),
            "completing a fork must not create a branch locally"
        );

        store.start_fork(TurnId::new("t-1"), BranchId::new("b-root"));
        store.cancel_fork();
        assert!(store.fork_draft().is_none());
    }

    #[tokio::test]
    async fn fork_draft_uses_the_configured_default_mode() {
        let (mut store, _rx) = store();
        store.update_config(ConfigDraft {
            fork_mode: Some(ForkMode::Explore),
            ..draft()
        });
        store.start_debate().unwrap();
        store.dispatch(SessionAction::DebateStarted(DebateId::new("d1")));

        store.start_fork(TurnId::new("t-1"), BranchId::new("b-root"));
        assert_eq!(store.fork_draft().unwrap().fork_mode, ForkMode::Explore);
    }

    #[tokio::test]
    async fn server_branches_land_in_the_forest() {
        let (mut store, _rx) = running_store();
        let root = root_branch();
        let child = Branch::child_of(
            &root,
            BranchId::new("b-1"),
            TurnId::new("t-3"),
            "what if",
            ForkMode::Explore,
        );
        store.add_branch(root);
        store.add_branch(child);
        assert_eq!(store.branches().len(), 2);
        assert!(store.branches().is_well_formed());

        store.select_branch(Some(BranchId::new("b-1")));
        assert_eq!(store.active_branch().unwrap().name, "what if");
    }

    #[tokio::test]
    async fn illegal_actions_are_reported_and_ignored() {
        let (mut store, _rx) = store();
        assert!(!store.dispatch(SessionAction::ReceiveTurn(turn(1))));
        assert_eq!(*store.session(), DebateSession::Idle);
    }
}
