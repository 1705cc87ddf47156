//! SessionBuilder - セッションの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 型パラメータで Clock を差し替える

use std::sync::Arc;

use super::config::SessionConfig;
use super::session::Session;
use crate::domain::{Decider, DeciderKind};
use crate::engine::{ConfigError, GreedyDecider, TieredDecider};
use crate::ports::{Clock, SystemClock, Transport};

/// BuildError はセッション構築時のエラー
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Engine(#[from] ConfigError),

    #[error("min_max_actions must be at least 1")]
    ZeroMinimumCap,

    #[error("initial_max_actions ({initial}) is below min_max_actions ({min})")]
    CapBelowMinimum { initial: usize, min: usize },

    #[error("decision_budget_ms must be positive")]
    ZeroBudget,
}

/// SessionBuilder はセッションを構築
///
/// # 使用例
/// ```ignore
/// let session = SessionBuilder::new(transport)
///     .config(config)
///     .build()?;
/// let summary = session.run().await?;
/// ```
///
/// # Fail-fast 設計
/// - build() 時に SessionConfig と EngineConfig を検証
/// - 不正な値があれば最初のラウンドの前に BuildError を返す
pub struct SessionBuilder<T, C = SystemClock> {
    transport: T,
    clock: C,
    config: SessionConfig,
    decider: Option<Arc<dyn Decider>>,
}

impl<T: Transport> SessionBuilder<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            clock: SystemClock,
            config: SessionConfig::default(),
            decider: None,
        }
    }
}

impl<T: Transport, C: Clock> SessionBuilder<T, C> {
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock<C2: Clock>(self, clock: C2) -> SessionBuilder<T, C2> {
        SessionBuilder {
            transport: self.transport,
            clock,
            config: self.config,
            decider: self.decider,
        }
    }

    /// `config.decider` の代わりに任意の Decider を使う
    pub fn decider(mut self, decider: impl Decider + 'static) -> Self {
        self.decider = Some(Arc::new(decider));
        self
    }

    /// # 検証
    /// - engine: しきい値・クォータ・重みの範囲
    /// - min_max_actions >= 1
    /// - initial_max_actions >= min_max_actions
    /// - decision_budget_ms > 0
    pub fn build(self) -> Result<Session<T, C>, BuildError> {
        let config = self.config;
        config.engine.validate()?;

        if config.min_max_actions == 0 {
            return Err(BuildError::ZeroMinimumCap);
        }
        if config.initial_max_actions < config.min_max_actions {
            return Err(BuildError::CapBelowMinimum {
                initial: config.initial_max_actions,
                min: config.min_max_actions,
            });
        }
        if config.decision_budget_ms == 0 {
            return Err(BuildError::ZeroBudget);
        }

        let decider: Arc<dyn Decider> = match self.decider {
            Some(decider) => decider,
            None => match config.decider {
                DeciderKind::Tiered => Arc::new(TieredDecider::new(config.engine.clone())),
                DeciderKind::Greedy => Arc::new(GreedyDecider::new()),
            },
        };

        Ok(Session::new(self.transport, self.clock, decider, config))
    }
}
