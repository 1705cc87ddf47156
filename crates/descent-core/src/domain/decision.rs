//! Decision - このラウンドに提出するアクションとその順序
//!
//! このモジュールは以下を定義:
//! - `Decision`: 何を提出するか
//! - `Decider` trait: ラウンドのスナップショットからどう選ぶか

use serde::{Deserialize, Serialize};

use super::ids::{ActionId, EffectId};
use super::outcome::Prediction;
use super::snapshot::RoundSnapshot;

/// 判定を出したエンジン
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeciderKind {
    #[default]
    Tiered,
    Greedy,
}

/// 選択の各段階が採用したアクション数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPicks {
    pub critical_blocks: usize,
    pub emergency_heals: usize,
    pub normal_blocks: usize,
    pub fillers: usize,
}

impl TierPicks {
    pub fn total(&self) -> usize {
        self.critical_blocks + self.emergency_heals + self.normal_blocks + self.fillers
    }
}

/// 判定に付く診断情報
///
/// 提出する sequence には影響しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionReport {
    pub decider: DeciderKind,
    pub capacity: usize,

    pub critical_effects: Vec<EffectId>,
    pub normal_effects: Vec<EffectId>,
    pub blocked_effects: Vec<EffectId>,

    pub picks: TierPicks,

    pub critical_health: bool,
    pub very_critical: bool,
    pub healing_quota: usize,

    pub prediction: Prediction,

    /// verifier が sequence を破棄した（reject-on-death のときだけ）
    pub rejected: bool,
}

/// 提出する action id（順序付き）と、その導出過程
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub actions: Vec<ActionId>,
    pub report: DecisionReport,
}

impl Decision {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Decider は 1 ラウンド分のアクションを選ぶ
///
/// # 設計原則
/// - 純粋関数: 同じスナップショットと capacity なら常に同じ判定
/// - 呼び出しをまたいで状態を持たない
///
/// # 引数
/// * `round` - ラウンドのスナップショット（vitals, effects, actions）
/// * `capacity` - 提出できるアクションの最大数
pub trait Decider: Send + Sync {
    fn decide(&self, round: &RoundSnapshot, capacity: usize) -> Decision;

    fn kind(&self) -> DeciderKind;
}
