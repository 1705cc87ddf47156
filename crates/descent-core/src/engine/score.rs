//! Score - vitals delta のスコア

use rust_decimal::Decimal;

use super::config::ScoreWeights;
use crate::domain::Values;

fn loss(x: Decimal) -> Decimal {
    x.min(Decimal::ZERO).abs()
}

fn gain(x: Decimal) -> Decimal {
    x.max(Decimal::ZERO)
}

/// delta が current hull と crew に与えるダメージ（両者は同じ重み）
///
/// アクションの self-harm にも effect の深刻度にも使う。
pub fn self_harm(d: &Values) -> Decimal {
    loss(d.hull()).saturating_add(loss(d.crew()))
}

pub fn healing(d: &Values) -> Decimal {
    gain(d.hull()).saturating_add(gain(d.crew()))
}

pub fn is_healing(d: &Values) -> bool {
    d.hull() > Decimal::ZERO || d.crew() > Decimal::ZERO
}

/// 正の変化量。current の増加は max の増加より重く見る
pub fn benefit(d: &Values, w: &ScoreWeights) -> Decimal {
    healing(d)
        .saturating_mul(w.current_gain)
        .saturating_add(gain(d.max_hull()))
        .saturating_add(gain(d.max_crew()))
}

/// free action の順位付けスコア
///
/// critical health では回復を上乗せし、self-harm を重く罰する。
pub fn overall(d: &Values, critical_health: bool, w: &ScoreWeights) -> Decimal {
    let benefit = benefit(d, w);
    let harm = self_harm(d);
    if critical_health {
        benefit
            .saturating_add(healing(d).saturating_mul(w.critical_heal_bonus))
            .saturating_sub(harm.saturating_mul(w.critical_harm_penalty))
    } else {
        benefit.saturating_sub(harm.saturating_mul(w.harm_penalty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn delta(hull: Decimal, max_hull: Decimal, crew: Decimal, max_crew: Decimal) -> Values {
        Values::new(hull, max_hull, crew, max_crew)
    }

    #[test]
    fn self_harm_sums_losses_only() {
        let d = delta(dec!(-5), dec!(-100), dec!(3), dec!(0));
        assert_eq!(self_harm(&d), dec!(5));

        let d = delta(dec!(-5), dec!(0), dec!(-7), dec!(0));
        assert_eq!(self_harm(&d), dec!(12));
    }

    #[rstest]
    #[case::hull_heal(Values::hull_delta(dec!(5)), dec!(6))]
    #[case::small_heal(Values::hull_delta(dec!(2)), dec!(2.4))]
    #[case::max_only(delta(dec!(0), dec!(10), dec!(0), dec!(4)), dec!(14))]
    #[case::mixed(delta(dec!(-3), dec!(0), dec!(5), dec!(-2)), dec!(6))]
    fn benefit_weights_current_gains(#[case] d: Values, #[case] expected: Decimal) {
        assert_eq!(benefit(&d, &ScoreWeights::default()), expected);
    }

    #[test]
    fn healing_requires_positive_current_delta() {
        assert!(is_healing(&Values::crew_delta(dec!(1))));
        assert!(!is_healing(&delta(dec!(0), dec!(50), dec!(-1), dec!(50))));
        assert!(!is_healing(&Values::default()));
        assert_eq!(healing(&delta(dec!(4), dec!(0), dec!(-2), dec!(0))), dec!(4));
    }

    #[test]
    fn overall_penalizes_harm_harder_when_critical() {
        let w = ScoreWeights::default();
        let d = delta(dec!(10), dec!(0), dec!(-2), dec!(0));

        // benefit 12, harm 2
        assert_eq!(overall(&d, false, &w), dec!(6));
        // 12 + 4*10 - 10*2
        assert_eq!(overall(&d, true, &w), dec!(32));
    }
}
