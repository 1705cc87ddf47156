//! TieredDecider - classify → select → order → verify

use std::collections::HashSet;

use tracing::debug;

use super::config::EngineConfig;
use super::index::RoundIndex;
use super::order::build_order;
use super::select::select;
use super::threat::classify;
use super::verify::verify;
use crate::domain::{Decider, DeciderKind, Decision, DecisionReport, EffectId, RoundSnapshot};

/// 回復を考慮した段階的エンジン
///
/// 純粋関数: 検索テーブルは呼び出しごとに作り直して捨てる。
#[derive(Debug, Clone, Default)]
pub struct TieredDecider {
    config: EngineConfig,
}

impl TieredDecider {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Decider for TieredDecider {
    fn decide(&self, round: &RoundSnapshot, capacity: usize) -> Decision {
        let config = &self.config;
        let index = RoundIndex::build(round);

        let threats = classify(&round.values, &round.effects, config);
        let selection = select(&round.values, &threats, &index, capacity, config);
        let critical: HashSet<EffectId> = threats.critical.iter().map(|e| e.id).collect();
        let ordered = build_order(
            &selection.chosen,
            &index,
            &critical,
            &round.values,
            capacity,
            config,
        );

        let sequence = ordered.iter().map(|a| a.id).collect();
        let verdict = verify(sequence, round, &index, config.verify_policy);

        debug!(
            capacity,
            critical = threats.critical.len(),
            normal = threats.normal.len(),
            critical_health = selection.critical_health,
            very_critical = selection.very_critical,
            picks = ?selection.picks,
            chosen = verdict.actions.len(),
            death_step = ?verdict.prediction.death_step,
            "tiered decision"
        );

        Decision {
            actions: verdict.actions,
            report: DecisionReport {
                decider: DeciderKind::Tiered,
                capacity,
                critical_effects: threats.critical.iter().map(|e| e.id).collect(),
                normal_effects: threats.normal.iter().map(|e| e.id).collect(),
                blocked_effects: selection.blocked,
                picks: selection.picks,
                critical_health: selection.critical_health,
                very_critical: selection.very_critical,
                healing_quota: selection.healing_quota,
                prediction: verdict.prediction,
                rejected: verdict.rejected,
            },
        }
    }

    fn kind(&self) -> DeciderKind {
        DeciderKind::Tiered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Action, ActionId, Effect, Values};
    use crate::engine::VerifyPolicy;
    use rust_decimal_macros::dec;

    #[test]
    fn report_describes_the_round() {
        let round = RoundSnapshot::new(
            Values::new(dec!(10), dec!(100), dec!(80), dec!(100)),
            vec![
                Effect::new(1, 1, Values::hull_delta(dec!(-15))),
                Effect::new(2, 2, Values::crew_delta(dec!(-1))),
            ],
            vec![
                Action::blocking(5, 1, Values::hull_delta(dec!(5))),
                Action::free(6, Values::hull_delta(dec!(30))),
            ],
        );
        let decision = TieredDecider::default().decide(&round, 3);

        let report = &decision.report;
        assert_eq!(report.decider, DeciderKind::Tiered);
        // hull がすでに 10% なので、crew のかすり傷も critical
        assert_eq!(report.critical_effects, vec![EffectId::new(1), EffectId::new(2)]);
        assert!(report.normal_effects.is_empty());
        assert_eq!(report.blocked_effects, vec![EffectId::new(1)]);
        assert!(report.very_critical);
        assert_eq!(report.picks.critical_blocks, 1);
        assert_eq!(report.picks.emergency_heals, 1);
        // hull は low だが、step 1 の blocker に余裕がないので先に出す
        assert_eq!(decision.actions, vec![ActionId::new(5), ActionId::new(6)]);
        assert_eq!(report.prediction.unblocked, vec![EffectId::new(2)]);
        assert!(report.prediction.survives());
    }

    #[test]
    fn reject_policy_can_empty_the_decision() {
        let round = RoundSnapshot::new(
            Values::new(dec!(5), dec!(100), dec!(80), dec!(100)),
            vec![Effect::new(1, 1, Values::hull_delta(dec!(-50)))],
            vec![Action::free(6, Values::hull_delta(dec!(1)))],
        );
        let config = EngineConfig {
            verify_policy: VerifyPolicy::RejectOnDeath,
            ..EngineConfig::default()
        };

        let decision = TieredDecider::new(config).decide(&round, 2);
        assert!(decision.is_empty());
        assert!(decision.report.rejected);

        let decision = TieredDecider::default().decide(&round, 2);
        assert_eq!(decision.actions, vec![ActionId::new(6)]);
    }

    #[test]
    fn critical_blocks_land_in_time_ahead_of_a_normal_one() {
        let round = RoundSnapshot::new(
            Values::new(dec!(50), dec!(100), dec!(100), dec!(100)),
            vec![
                Effect::new(1, 1, Values::crew_delta(dec!(-5))),
                Effect::new(2, 2, Values::hull_delta(dec!(-60))),
                Effect::new(3, 2, Values::hull_delta(dec!(-55))),
            ],
            vec![
                Action::blocking(10, 1, Values::default()),
                Action::blocking(20, 2, Values::default()),
                Action::blocking(30, 3, Values::default()),
            ],
        );
        let decision = TieredDecider::default().decide(&round, 3);

        assert_eq!(
            decision.actions,
            vec![ActionId::new(20), ActionId::new(30), ActionId::new(10)]
        );
        // 通るのは crew のかすり傷だけ
        assert_eq!(decision.report.prediction.unblocked, vec![EffectId::new(1)]);
        assert!(decision.report.prediction.survives());
    }
}
