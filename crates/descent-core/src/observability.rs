//! Observability - 終了したセッションが呼び出し元へ返す集計

use serde::{Deserialize, Serialize};

/// セッションループが止まった理由
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEnd {
    /// サーバーがゲーム終了を通知した
    GameEnded,
    /// サーバーが致命的エラーを送って切断した
    ServerError,
    /// 上記以外で接続が閉じた
    #[default]
    Disconnected,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub rounds: usize,
    pub actions_sent: usize,
    pub warnings: usize,
    /// 設定した decider の代わりに GreedyDecider で答えたラウンド数
    pub fallbacks: usize,
    pub budget_overruns: usize,
    /// 提出した sequence が replay で死亡したラウンド数
    pub predicted_deaths: usize,
    /// decode できずに読み飛ばしたメッセージ数
    pub undecodable: usize,
    pub slowest_decision_ms: i64,
    pub final_max_actions: usize,
    pub end: SessionEnd,
}
