//! Session - ラウンド応答ループ
//!
//! # フロー
//! 1. Transport::recv() で server message を受信
//! 2. GAME_ROUND: capacity を決め、Decider を blocking worker で実行
//! 3. 予算超過・空の結果は GreedyDecider で代替
//! 4. SELECT_ACTIONS を返信
//! 5. WARNING で上限を調整、ERROR / GAME_ENDED / 切断で終了

use std::ops::ControlFlow;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::config::SessionConfig;
use crate::domain::{Decider, DeciderKind, Decision, RoundSnapshot};
use crate::domain::values::percent;
use crate::engine::GreedyDecider;
use crate::error::DescentError;
use crate::observability::{SessionEnd, SessionSummary};
use crate::ports::{Clock, Transport, TransportError};
use crate::protocol::{ClientMessage, GameRound, ServerMessage, TeamStanding};

/// アクション数超過時にサーバーが送る warning に含まれる文字列
const TOO_MANY_ACTIONS: &str = "too many actions";

/// Session は一つのゲーム接続を最後まで処理する
///
/// [`super::SessionBuilder`] が設定を検証して構築する。
pub struct Session<T, C> {
    transport: T,
    clock: C,
    decider: Arc<dyn Decider>,
    fallback: GreedyDecider,
    config: SessionConfig,
    max_actions: usize,
    summary: SessionSummary,
}

impl<T: Transport, C: Clock> Session<T, C> {
    pub(super) fn new(transport: T, clock: C, decider: Arc<dyn Decider>, config: SessionConfig) -> Self {
        Self {
            transport,
            clock,
            decider,
            fallback: GreedyDecider::new(),
            max_actions: config.initial_max_actions,
            config,
            summary: SessionSummary::default(),
        }
    }

    /// 現在のアクション上限
    pub fn max_actions(&self) -> usize {
        self.max_actions
    }

    pub fn decider_kind(&self) -> DeciderKind {
        self.decider.kind()
    }

    /// ゲーム終了、サーバーエラー、切断のいずれかまで処理する
    pub async fn run(mut self) -> Result<SessionSummary, DescentError> {
        info!(
            decider = ?self.decider.kind(),
            max_actions = self.max_actions,
            budget_ms = self.config.decision_budget_ms,
            "session started"
        );

        let end = loop {
            let message = match self.transport.recv().await {
                Ok(Some(message)) => message,
                Ok(None) => break SessionEnd::Disconnected,
                Err(DescentError::Codec(err)) => {
                    warn!(error = %err, "skipping undecodable message");
                    self.summary.undecodable += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };

            match self.handle(message).await {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(end)) => break end,
                Err(DescentError::Transport(TransportError::Closed)) => break SessionEnd::Disconnected,
                Err(err) => return Err(err),
            }
        };

        self.summary.final_max_actions = self.max_actions;
        self.summary.end = end;
        info!(summary = ?self.summary, "session finished");
        Ok(self.summary)
    }

    async fn handle(&mut self, message: ServerMessage) -> Result<ControlFlow<SessionEnd>, DescentError> {
        match message {
            ServerMessage::GameRound(round) => {
                self.on_round(round).await?;
                Ok(ControlFlow::Continue(()))
            }
            ServerMessage::Warning { msg } => {
                self.on_warning(&msg);
                Ok(ControlFlow::Continue(()))
            }
            ServerMessage::Error { msg } => {
                error!(msg = %msg, "server error, disconnecting");
                Ok(ControlFlow::Break(SessionEnd::ServerError))
            }
            ServerMessage::GameEnded { leaderboard } => {
                log_leaderboard(&leaderboard);
                Ok(ControlFlow::Break(SessionEnd::GameEnded))
            }
        }
    }

    async fn on_round(&mut self, round: GameRound) -> Result<(), DescentError> {
        let snapshot = round.snapshot();
        log_round_status(&round, &snapshot);

        let capacity = self.max_actions.min(snapshot.actions.len());
        let started = self.clock.now();
        let decision = self.decide(snapshot, capacity).await;
        let elapsed_ms = (self.clock.now() - started).num_milliseconds();

        self.summary.rounds += 1;
        self.summary.actions_sent += decision.actions.len();
        self.summary.slowest_decision_ms = self.summary.slowest_decision_ms.max(elapsed_ms);

        let prediction = &decision.report.prediction;
        if !prediction.survives() {
            self.summary.predicted_deaths += 1;
        }
        info!(
            round = round.round,
            round_id = %round.round_id,
            decider = ?decision.report.decider,
            capacity,
            chosen = decision.actions.len(),
            actions = ?decision.actions,
            death_step = ?prediction.death_step,
            elapsed_ms,
            "selected actions"
        );

        self.transport
            .send(ClientMessage::SelectActions {
                round_id: round.round_id,
                actions: decision.actions,
            })
            .await
    }

    /// 設定の Decider を返信予算内で実行する
    ///
    /// 遅延・失敗・空の結果なら GreedyDecider にフォールバック。
    async fn decide(&mut self, snapshot: RoundSnapshot, capacity: usize) -> Decision {
        let snapshot = Arc::new(snapshot);
        let decider = Arc::clone(&self.decider);
        let job = {
            let snapshot = Arc::clone(&snapshot);
            tokio::task::spawn_blocking(move || decider.decide(&snapshot, capacity))
        };

        let decision = match tokio::time::timeout(self.config.decision_budget(), job).await {
            Ok(Ok(decision)) => decision,
            Ok(Err(err)) => {
                error!(error = %err, "decider task failed, using greedy fallback");
                self.summary.fallbacks += 1;
                return self.fallback.decide(&snapshot, capacity);
            }
            Err(_) => {
                warn!(
                    budget_ms = self.config.decision_budget_ms,
                    "decision budget exceeded, using greedy fallback"
                );
                self.summary.budget_overruns += 1;
                self.summary.fallbacks += 1;
                return self.fallback.decide(&snapshot, capacity);
            }
        };

        if decision.is_empty()
            && !snapshot.actions.is_empty()
            && self.config.fallback_on_empty
            && decision.report.decider != DeciderKind::Greedy
        {
            let greedy = self.fallback.decide(&snapshot, capacity);
            if !greedy.is_empty() {
                debug!(chosen = greedy.actions.len(), "empty decision, using greedy fallback");
                self.summary.fallbacks += 1;
                return greedy;
            }
        }
        decision
    }

    fn on_warning(&mut self, msg: &str) {
        self.summary.warnings += 1;
        warn!(msg = %msg, "server warning");

        if msg.to_lowercase().contains(TOO_MANY_ACTIONS) && self.max_actions > self.config.min_max_actions {
            self.max_actions -= 1;
            info!(max_actions = self.max_actions, "lowered action cap");
        }
    }
}

fn log_round_status(round: &GameRound, snapshot: &RoundSnapshot) {
    let v = &snapshot.values;
    info!(
        round = round.round,
        round_id = %round.round_id,
        hull = %v.hull(),
        max_hull = %v.max_hull(),
        hull_pct = %percent(v.hull_strength, v.max_hull_strength),
        crew = %v.crew(),
        max_crew = %v.max_crew(),
        crew_pct = %percent(v.crew_health, v.max_crew_health),
        effects = snapshot.effects.len(),
        actions = snapshot.actions.len(),
        "round started"
    );
}

fn log_leaderboard(leaderboard: &[TeamStanding]) {
    info!(teams = leaderboard.len(), "game ended");
    for team in leaderboard {
        info!(
            team = %team.name,
            last_round = team.last_round,
            points = %team.points,
            "final standing"
        );
    }
}
