//! Snapshot - ラウンドの入力（予定された hazard、選べるアクション、現在の vitals）

use serde::{Deserialize, Deserializer, Serialize};

use super::ids::{ActionId, EffectId};
use super::values::Values;

/// 予定された hazard
///
/// それを対象とするアクションが `step` 以前の位置に提出されなければ `step` で発動する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    pub id: EffectId,

    /// 提出位置（1 始まり）
    pub step: u32,

    #[serde(default)]
    pub values: Values,
}

impl Effect {
    pub fn new(id: i64, step: u32, values: Values) -> Self {
        Self {
            id: EffectId::new(id),
            step,
            values,
        }
    }
}

/// 提出できるアクション（effect を 1 つ対抗することがある）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: ActionId,

    /// free action なら `None`（ワイヤ上では `-1` も同じ意味）
    #[serde(
        default,
        deserialize_with = "deserialize_effect_ref",
        skip_serializing_if = "Option::is_none"
    )]
    pub effect_id: Option<EffectId>,

    #[serde(default)]
    pub values: Values,
}

impl Action {
    pub fn free(id: i64, values: Values) -> Self {
        Self {
            id: ActionId::new(id),
            effect_id: None,
            values,
        }
    }

    pub fn blocking(id: i64, effect: i64, values: Values) -> Self {
        Self {
            id: ActionId::new(id),
            effect_id: Some(EffectId::new(effect)),
            values,
        }
    }
}

fn deserialize_effect_ref<'de, D>(deserializer: D) -> Result<Option<EffectId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.filter(|id| *id >= 0).map(EffectId::new))
}

/// 1 ラウンドで判定関数が見るもの全て
///
/// 所有者はラウンドハンドラ。Decider は借用するだけ。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub values: Values,
    pub effects: Vec<Effect>,
    pub actions: Vec<Action>,
}

impl RoundSnapshot {
    pub fn new(values: Values, effects: Vec<Effect>, actions: Vec<Action>) -> Self {
        Self {
            values,
            effects,
            actions,
        }
    }
}
