//! Protocol - ゲームサーバーとやり取りするメッセージ
//!
//! JSON で 1 メッセージ 1 オブジェクト、`"type"` でタグ付け。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Action, ActionId, Effect, RoundId, RoundSnapshot, Values};
use crate::error::DescentError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submarine {
    #[serde(default)]
    pub values: Values,
}

/// 新しいラウンド（サーバーの期限までに返答が必要）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRound {
    pub round_id: RoundId,

    /// 表示用のラウンド番号
    #[serde(default)]
    pub round: u32,

    #[serde(default)]
    pub our_submarine: Submarine,

    #[serde(default)]
    pub effects: Vec<Effect>,

    #[serde(default)]
    pub actions: Vec<Action>,
}

impl GameRound {
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot::new(
            self.our_submarine.values.clone(),
            self.effects.clone(),
            self.actions.clone(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    pub name: String,
    #[serde(default)]
    pub last_round: u32,
    #[serde(default)]
    pub points: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    GameRound(GameRound),

    /// 回復可能: 接続は維持される
    Warning { msg: String },

    /// 致命的: サーバーから切断される
    Error { msg: String },

    GameEnded {
        #[serde(default)]
        leaderboard: Vec<TeamStanding>,
    },
}

impl ServerMessage {
    pub fn from_json(line: &str) -> Result<Self, DescentError> {
        Ok(serde_json::from_str(line)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    SelectActions {
        round_id: RoundId,
        actions: Vec<ActionId>,
    },
}

impl ClientMessage {
    pub fn to_json(&self) -> Result<String, DescentError> {
        Ok(serde_json::to_string(self)?)
    }
}
