//! Outcome - sequence を提出したときに verifier が予測する結果
//!
//! ここでは予測の形だけを定義する。replay 本体は `engine::verify`。

use serde::{Deserialize, Serialize};

use super::ids::EffectId;
use super::values::Values;

/// replay 結果の大まかな分類
///
/// SCREAMING_SNAKE_CASE で serialize: SURVIVES / DIES
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Survives,
    Dies,
}

/// effect スケジュールに対して sequence を replay した結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// 最後の step を replay した後の vitals
    pub final_values: Values,

    /// replay 中に最初に死亡した step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_step: Option<u32>,

    /// 間に合う対抗がなく発動した effect
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unblocked: Vec<EffectId>,
}

impl Prediction {
    /// 何も replay しないラウンドの予測
    pub fn untouched(values: Values) -> Self {
        Self {
            final_values: values,
            death_step: None,
            unblocked: Vec::new(),
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        if self.death_step.is_some() {
            OutcomeKind::Dies
        } else {
            OutcomeKind::Survives
        }
    }

    pub fn survives(&self) -> bool {
        self.kind() == OutcomeKind::Survives
    }
}
