//! Values - vitals とその演算
//!
//! # 実装詳細
//! - ワイヤ上ではどのフィールドも absent になり得る
//! - absent は演算では 0 として扱うが、コピーしただけなら absent のまま

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ratio 判定で current / max を割るときの桁数
pub const DEFAULT_RATIO_SCALE: u32 = 2;

/// hull と crew の vitals、またはその delta
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Values {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hull_strength: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hull_strength: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crew_health: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_crew_health: Option<Decimal>,
}

impl Values {
    pub fn new(hull: Decimal, max_hull: Decimal, crew: Decimal, max_crew: Decimal) -> Self {
        Self {
            hull_strength: Some(hull),
            max_hull_strength: Some(max_hull),
            crew_health: Some(crew),
            max_crew_health: Some(max_crew),
        }
    }

    /// current hull だけを変える delta
    pub fn hull_delta(hull: Decimal) -> Self {
        Self {
            hull_strength: Some(hull),
            ..Self::default()
        }
    }

    /// current crew health だけを変える delta
    pub fn crew_delta(crew: Decimal) -> Self {
        Self {
            crew_health: Some(crew),
            ..Self::default()
        }
    }

    pub fn hull(&self) -> Decimal {
        self.hull_strength.unwrap_or_default()
    }

    pub fn max_hull(&self) -> Decimal {
        self.max_hull_strength.unwrap_or_default()
    }

    pub fn crew(&self) -> Decimal {
        self.crew_health.unwrap_or_default()
    }

    pub fn max_crew(&self) -> Decimal {
        self.max_crew_health.unwrap_or_default()
    }

    /// `self` に `delta` を加算してクランプする
    ///
    /// # ルール
    /// - max は 0 未満にならない
    /// - current は `[0, max]` に収める
    /// - 結果は常に全フィールドが present（absent は 0 として返る）
    ///
    /// 空の delta で値が変わらないのは、全フィールドが範囲内のときだけ。
    /// 範囲外の current はクランプされ、absent は `Some(0)` になる。
    pub fn sum(&self, delta: &Values) -> Values {
        let max_hull = self.max_hull().saturating_add(delta.max_hull()).max(Decimal::ZERO);
        let max_crew = self.max_crew().saturating_add(delta.max_crew()).max(Decimal::ZERO);

        let hull = self.hull().saturating_add(delta.hull()).min(max_hull).max(Decimal::ZERO);
        let crew = self.crew().saturating_add(delta.crew()).min(max_crew).max(Decimal::ZERO);

        Values::new(hull, max_hull, crew, max_crew)
    }

    /// どちらかの vital が 0 以下なら死亡
    pub fn is_dead(&self) -> bool {
        self.hull() <= Decimal::ZERO || self.crew() <= Decimal::ZERO
    }

    pub fn hull_ratio(&self, scale: u32) -> Decimal {
        ratio(self.hull(), self.max_hull(), scale)
    }

    pub fn crew_ratio(&self, scale: u32) -> Decimal {
        ratio(self.crew(), self.max_crew(), scale)
    }

    /// どちらかの vital が max の `threshold` を下回るなら true
    pub fn is_low(&self, threshold: Decimal, scale: u32) -> bool {
        self.hull_ratio(scale) < threshold || self.crew_ratio(scale) < threshold
    }
}

/// `current / max` を `scale` 桁で四捨五入（`max <= 0` なら 0）
pub fn ratio(current: Decimal, max: Decimal, scale: u32) -> Decimal {
    if max <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    current
        .checked_div(max)
        .unwrap_or(Decimal::MAX)
        .round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

/// 表示用のパーセント（例: 1/8 なら `12.5`）
pub fn percent(current: Option<Decimal>, max: Option<Decimal>) -> Decimal {
    match (current, max) {
        (Some(current), Some(max)) if !max.is_zero() => ratio(current, max, 4) * Decimal::ONE_HUNDRED,
        _ => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn full(hull: Decimal, crew: Decimal) -> Values {
        Values::new(hull, dec!(100), crew, dec!(100))
    }

    #[test]
    fn sum_clamps_current_to_max() {
        let v = full(dec!(95), dec!(50)).sum(&Values::hull_delta(dec!(20)));
        assert_eq!(v.hull(), dec!(100));
        assert_eq!(v.crew(), dec!(50));
    }

    #[test]
    fn sum_floors_at_zero() {
        let v = full(dec!(10), dec!(50)).sum(&Values::hull_delta(dec!(-15)));
        assert_eq!(v.hull(), Decimal::ZERO);
        assert!(v.is_dead());
    }

    #[test]
    fn shrinking_max_pulls_current_down() {
        let delta = Values {
            max_crew_health: Some(dec!(-70)),
            ..Values::default()
        };
        let v = full(dec!(100), dec!(80)).sum(&delta);
        assert_eq!(v.max_crew(), dec!(30));
        assert_eq!(v.crew(), dec!(30));
    }

    #[test]
    fn negative_max_floors_at_zero() {
        let delta = Values {
            max_hull_strength: Some(dec!(-500)),
            ..Values::default()
        };
        let v = full(dec!(100), dec!(80)).sum(&delta);
        assert_eq!(v.max_hull(), Decimal::ZERO);
        assert_eq!(v.hull(), Decimal::ZERO);
    }

    #[test]
    fn absent_delta_is_identity() {
        let v = full(dec!(42.5), dec!(13));
        assert_eq!(v.sum(&Values::default()), v);
    }

    #[test]
    fn absent_original_counts_as_zero() {
        let v = Values::default().sum(&Values::new(dec!(5), dec!(10), dec!(5), dec!(10)));
        assert_eq!(v, Values::new(dec!(5), dec!(10), dec!(5), dec!(10)));
    }

    #[test]
    fn clone_keeps_absent_fields_absent() {
        let v = Values::hull_delta(dec!(3));
        let c = v.clone();
        assert_eq!(c.crew_health, None);
        assert_eq!(c.max_hull_strength, None);
    }

    #[rstest]
    #[case::hull_zero(dec!(0), dec!(10), true)]
    #[case::crew_zero(dec!(10), dec!(0), true)]
    #[case::both_alive(dec!(1), dec!(1), false)]
    fn is_dead_checks_each_vital(#[case] hull: Decimal, #[case] crew: Decimal, #[case] dead: bool) {
        assert_eq!(full(hull, crew).is_dead(), dead);
    }

    #[test]
    fn absent_vitals_count_as_dead() {
        assert!(Values::default().is_dead());
    }

    #[rstest]
    #[case::hull_low(dec!(29), dec!(100), true)]
    #[case::crew_low(dec!(100), dec!(10), true)]
    #[case::exactly_at_threshold(dec!(30), dec!(30), false)]
    #[case::healthy(dec!(80), dec!(90), false)]
    fn is_low_uses_either_vital(#[case] hull: Decimal, #[case] crew: Decimal, #[case] low: bool) {
        assert_eq!(full(hull, crew).is_low(dec!(0.30), DEFAULT_RATIO_SCALE), low);
    }

    #[test]
    fn ratio_rounds_half_up_at_scale() {
        // 0.445 -> 0.45 なので 0.45 未満ではない
        assert_eq!(ratio(dec!(44.5), dec!(100), 2), dec!(0.45));
        assert_eq!(ratio(dec!(1), dec!(3), 2), dec!(0.33));
    }

    #[test]
    fn ratio_is_zero_without_max() {
        assert_eq!(ratio(dec!(10), Decimal::ZERO, 2), Decimal::ZERO);
        assert!(Values::new(dec!(10), dec!(0), dec!(10), dec!(100)).is_low(dec!(0.15), 2));
    }

    #[test]
    fn vitals_parse_from_numbers_and_strings() {
        let v: Values = serde_json::from_str(
            r#"{ "hullStrength": 10, "maxHullStrength": "100", "crewHealth": 80.5 }"#,
        )
        .unwrap();
        assert_eq!(v.hull(), dec!(10));
        assert_eq!(v.max_hull(), dec!(100));
        assert_eq!(v.crew(), dec!(80.5));
        assert_eq!(v.max_crew_health, None);
    }

    #[test]
    fn percent_for_display() {
        assert_eq!(percent(Some(dec!(1)), Some(dec!(8))), dec!(12.50));
        assert_eq!(percent(None, Some(dec!(8))), Decimal::ZERO);
    }
}
