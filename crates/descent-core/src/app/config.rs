//! SessionConfig - セッションの設定
//!
//! バイナリが JSON から読み込む。全フィールドにデフォルトあり。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DeciderKind;
use crate::engine::EngineConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// 適応的なアクション上限の初期値
    pub initial_max_actions: usize,

    /// 上限はこれより小さくならない
    pub min_max_actions: usize,

    /// 1 回の判定に使える時間（超えたら GreedyDecider が答える）
    pub decision_budget_ms: u64,

    /// アクションがあるのに設定の Decider が空を返したら GreedyDecider で答える
    pub fallback_on_empty: bool,

    pub decider: DeciderKind,

    pub engine: EngineConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_max_actions: 5,
            min_max_actions: 1,
            decision_budget_ms: 800,
            fallback_on_empty: true,
            decider: DeciderKind::Tiered,
            engine: EngineConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn decision_budget(&self) -> Duration {
        Duration::from_millis(self.decision_budget_ms)
    }
}
