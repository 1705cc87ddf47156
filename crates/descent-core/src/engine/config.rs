//! EngineConfig - 判定エンジンの調整値
//!
//! # 設計
//! - しきい値、スコアの重み、回復枠、verifier の方針をまとめて持つ
//! - 全フィールドにデフォルトがあるので、部分的な JSON でよい
//!   （`{ "verify_policy": "reject_on_death" }` も有効な設定）

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::values::DEFAULT_RATIO_SCALE;

/// replay が死亡を予測したときの verifier の挙動
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyPolicy {
    /// そのまま提出する（何も出さないより悪くはならない）
    #[default]
    AlwaysAttempt,

    /// 空の sequence に置き換える
    RejectOnDeath,
}

/// アクションのスコア計算で使う倍率
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// `benefit` における current hull/crew 増加の重み
    pub current_gain: Decimal,

    /// 通常時の `overall` における self-harm のペナルティ
    pub harm_penalty: Decimal,

    /// critical health 時の `overall` における回復ボーナス
    pub critical_heal_bonus: Decimal,

    /// critical health 時の `overall` における self-harm のペナルティ
    pub critical_harm_penalty: Decimal,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            current_gain: dec!(1.2),
            harm_penalty: dec!(3),
            critical_heal_bonus: dec!(4),
            critical_harm_penalty: dec!(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// effect 単体でこれを下回るなら critical
    ///
    /// order builder も rolling state がこれを下回る間は回復を優先する。
    pub hazard_threshold: Decimal,

    /// critical health: 緊急回復を発動
    pub critical_health: Decimal,

    /// very critical health: 回復枠を広げる
    pub very_critical_health: Decimal,

    /// current / max の割り算で残す小数桁数
    pub ratio_scale: u32,

    /// critical health 時に回復へ割り当てる capacity の割合
    pub healing_quota: Decimal,

    /// very critical health 時に回復へ割り当てる capacity の割合
    pub emergency_healing_quota: Decimal,

    pub weights: ScoreWeights,

    pub verify_policy: VerifyPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hazard_threshold: dec!(0.45),
            critical_health: dec!(0.30),
            very_critical_health: dec!(0.15),
            ratio_scale: DEFAULT_RATIO_SCALE,
            healing_quota: dec!(0.25),
            emergency_healing_quota: dec!(0.40),
            weights: ScoreWeights::default(),
            verify_policy: VerifyPolicy::AlwaysAttempt,
        }
    }
}

/// ConfigError は設定値の検証エラー
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("threshold `{name}` must be in (0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: Decimal },

    #[error("very_critical_health ({very_critical}) must not exceed critical_health ({critical})")]
    ThresholdOrder {
        very_critical: Decimal,
        critical: Decimal,
    },

    #[error("quota `{name}` must be in [0, 1], got {value}")]
    QuotaOutOfRange { name: &'static str, value: Decimal },

    #[error("weight `{name}` must not be negative, got {value}")]
    NegativeWeight { name: &'static str, value: Decimal },

    #[error("ratio_scale {0} exceeds the supported decimal precision")]
    RatioScaleTooLarge(u32),
}

impl EngineConfig {
    /// 値の範囲を検証
    ///
    /// 最初のラウンドの前に SessionBuilder から呼ばれる。
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("hazard_threshold", self.hazard_threshold),
            ("critical_health", self.critical_health),
            ("very_critical_health", self.very_critical_health),
        ] {
            if value <= Decimal::ZERO || value > Decimal::ONE {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if self.very_critical_health > self.critical_health {
            return Err(ConfigError::ThresholdOrder {
                very_critical: self.very_critical_health,
                critical: self.critical_health,
            });
        }

        for (name, value) in [
            ("healing_quota", self.healing_quota),
            ("emergency_healing_quota", self.emergency_healing_quota),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(ConfigError::QuotaOutOfRange { name, value });
            }
        }

        let w = &self.weights;
        for (name, value) in [
            ("current_gain", w.current_gain),
            ("harm_penalty", w.harm_penalty),
            ("critical_heal_bonus", w.critical_heal_bonus),
            ("critical_harm_penalty", w.critical_harm_penalty),
        ] {
            if value < Decimal::ZERO {
                return Err(ConfigError::NegativeWeight { name, value });
            }
        }

        if self.ratio_scale > 28 {
            return Err(ConfigError::RatioScaleTooLarge(self.ratio_scale));
        }
        Ok(())
    }
}
