//! Select - capacity 内での 4 段階選択
//!
//! # 段階
//! 1. critical な effect をブロック
//! 2. 自分の vitals が critical なら緊急回復
//! 3. 残りの effect をブロック
//! 4. 最良の free action で埋める

use std::cmp::Reverse;
use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::config::EngineConfig;
use super::index::RoundIndex;
use super::score::{benefit, healing, is_healing, overall, self_harm};
use super::threat::Threats;
use crate::domain::{Action, ActionId, Effect, EffectId, TierPicks, Values};

/// ラウンドで選んだアクション（未整列）
#[derive(Debug, Default)]
pub struct Selection<'a> {
    pub chosen: Vec<&'a Action>,
    pub blocked: Vec<EffectId>,
    pub picks: TierPicks,
    pub critical_health: bool,
    pub very_critical: bool,
    pub healing_quota: usize,
}

/// 選択リストと、所属判定用の id 集合
struct Picker<'a> {
    capacity: usize,
    chosen: Vec<&'a Action>,
    ids: HashSet<ActionId>,
    blocked: Vec<EffectId>,
}

impl<'a> Picker<'a> {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            chosen: Vec::new(),
            ids: HashSet::new(),
            blocked: Vec::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.chosen.len() >= self.capacity
    }

    fn contains(&self, action: &Action) -> bool {
        self.ids.contains(&action.id)
    }

    /// 満杯、または選択済みなら false
    fn take(&mut self, action: &'a Action, target: Option<EffectId>) -> bool {
        if self.is_full() || !self.ids.insert(action.id) {
            return false;
        }
        self.chosen.push(action);
        if let Some(effect) = target
            && !self.blocked.contains(&effect)
        {
            self.blocked.push(effect);
        }
        true
    }

    /// 未選択の候補のうち self-harm が最小のもの（同点なら benefit が大きい方）
    fn best_blocker(&self, candidates: &[&'a Action], config: &EngineConfig) -> Option<&'a Action> {
        candidates
            .iter()
            .copied()
            .filter(|a| !self.contains(a))
            .min_by_key(|a| (self_harm(&a.values), Reverse(benefit(&a.values, &config.weights))))
    }

    /// 段階 1 と 3 で共通: 空きがある間、effect ごとに blocker を 1 つ
    fn block_all(&mut self, effects: &[&'a Effect], index: &RoundIndex<'a>, config: &EngineConfig) -> usize {
        let mut added = 0;
        for effect in effects {
            if self.is_full() {
                break;
            }
            // 重複した effect id への対抗は 1 回だけ
            if self.blocked.contains(&effect.id) {
                continue;
            }
            if let Some(best) = self.best_blocker(index.candidates(effect.id), config)
                && self.take(best, Some(effect.id))
            {
                added += 1;
            }
        }
        added
    }
}

/// `max(1, floor(capacity * share))`
fn quota(capacity: usize, share: Decimal) -> usize {
    let slots = (Decimal::from(capacity) * share).floor().to_usize().unwrap_or(0);
    slots.max(1)
}

pub fn select<'a>(
    current: &Values,
    threats: &Threats<'a>,
    index: &RoundIndex<'a>,
    capacity: usize,
    config: &EngineConfig,
) -> Selection<'a> {
    let mut picker = Picker::new(capacity);
    let mut picks = TierPicks::default();

    picks.critical_blocks = picker.block_all(&threats.critical, index, config);

    let critical_health = current.is_low(config.critical_health, config.ratio_scale);
    let very_critical = current.is_low(config.very_critical_health, config.ratio_scale);
    let mut healing_quota = 0;
    if critical_health && !picker.is_full() {
        let share = if very_critical {
            config.emergency_healing_quota
        } else {
            config.healing_quota
        };
        healing_quota = quota(capacity, share);

        let mut heals: Vec<&Action> = index
            .free_actions()
            .iter()
            .copied()
            .filter(|a| is_healing(&a.values))
            .collect();
        heals.sort_by_key(|a| Reverse(healing(&a.values)));

        for action in heals {
            if picks.emergency_heals >= healing_quota || picker.is_full() {
                break;
            }
            if picker.take(action, None) {
                picks.emergency_heals += 1;
            }
        }
    }

    picks.normal_blocks = picker.block_all(&threats.normal, index, config);

    if !picker.is_full() {
        let mut rest: Vec<&Action> = index
            .free_actions()
            .iter()
            .copied()
            .filter(|a| !picker.contains(a))
            .collect();
        rest.sort_by_key(|a| Reverse(overall(&a.values, critical_health, &config.weights)));

        for action in rest {
            if picker.is_full() {
                break;
            }
            if picker.take(action, None) {
                picks.fillers += 1;
            }
        }
    }

    Selection {
        chosen: picker.chosen,
        blocked: picker.blocked,
        picks,
        critical_health,
        very_critical,
        healing_quota,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RoundSnapshot;
    use crate::engine::threat::classify;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn run(round: &RoundSnapshot, capacity: usize) -> Vec<i64> {
        let config = EngineConfig::default();
        let index = RoundIndex::build(round);
        let threats = classify(&round.values, &round.effects, &config);
        select(&round.values, &threats, &index, capacity, &config)
            .chosen
            .iter()
            .map(|a| a.id.get())
            .collect()
    }

    fn healthy() -> Values {
        Values::new(dec!(100), dec!(100), dec!(100), dec!(100))
    }

    #[test]
    fn critical_blocker_prefers_least_self_harm() {
        let round = RoundSnapshot::new(
            Values::new(dec!(10), dec!(100), dec!(80), dec!(100)),
            vec![Effect::new(1, 1, Values::hull_delta(dec!(-15)))],
            vec![
                Action::blocking(5, 1, Values::crew_delta(dec!(-4))),
                Action::blocking(6, 1, Values::crew_delta(dec!(-1))),
            ],
        );
        assert_eq!(run(&round, 1), vec![6]);
    }

    #[test]
    fn blocker_ties_break_on_benefit() {
        let round = RoundSnapshot::new(
            healthy(),
            vec![Effect::new(1, 1, Values::hull_delta(dec!(-5)))],
            vec![
                Action::blocking(5, 1, Values::hull_delta(dec!(1))),
                Action::blocking(6, 1, Values::hull_delta(dec!(3))),
            ],
        );
        assert_eq!(run(&round, 3), vec![6]);
    }

    #[test]
    fn criticals_come_before_normals_even_when_normals_fire_first() {
        let round = RoundSnapshot::new(
            Values::new(dec!(60), dec!(100), dec!(100), dec!(100)),
            vec![
                Effect::new(1, 1, Values::hull_delta(dec!(-5))),
                Effect::new(2, 3, Values::hull_delta(dec!(-50))),
            ],
            vec![
                Action::blocking(10, 1, Values::default()),
                Action::blocking(20, 2, Values::default()),
            ],
        );
        assert_eq!(run(&round, 1), vec![20]);
        assert_eq!(run(&round, 2), vec![20, 10]);
    }

    #[rstest]
    // hull 25% は critical: quota = max(1, floor(8 * 0.25)) = 2
    #[case::critical(dec!(25), 2)]
    // hull 10% は very critical: quota = floor(8 * 0.4) = 3
    #[case::very_critical(dec!(10), 3)]
    fn emergency_healing_respects_quota(#[case] hull: Decimal, #[case] expected: usize) {
        let actions = (1..=6)
            .map(|i| Action::free(i, Values::hull_delta(Decimal::from(i))))
            .collect();
        let round = RoundSnapshot::new(Values::new(hull, dec!(100), dec!(100), dec!(100)), vec![], actions);

        let config = EngineConfig::default();
        let index = RoundIndex::build(&round);
        let threats = classify(&round.values, &round.effects, &config);
        let selection = select(&round.values, &threats, &index, 8, &config);

        assert!(selection.critical_health);
        assert_eq!(selection.healing_quota, expected);
        assert_eq!(selection.picks.emergency_heals, expected);
        // 回復量の大きい順
        let first: Vec<i64> = selection.chosen.iter().take(expected).map(|a| a.id.get()).collect();
        assert_eq!(first, (0..expected as i64).map(|k| 6 - k).collect::<Vec<_>>());
    }

    #[test]
    fn quota_never_drops_below_one() {
        assert_eq!(quota(1, dec!(0.25)), 1);
        assert_eq!(quota(3, dec!(0.25)), 1);
        assert_eq!(quota(10, dec!(0.4)), 4);
    }

    #[test]
    fn no_emergency_healing_when_healthy() {
        let round = RoundSnapshot::new(healthy(), vec![], vec![Action::free(1, Values::hull_delta(dec!(5)))]);
        let config = EngineConfig::default();
        let index = RoundIndex::build(&round);
        let threats = classify(&round.values, &round.effects, &config);
        let selection = select(&round.values, &threats, &index, 2, &config);

        assert!(!selection.critical_health);
        assert_eq!(selection.picks.emergency_heals, 0);
        assert_eq!(selection.picks.fillers, 1);
    }

    #[test]
    fn fill_ranks_free_actions_by_overall_score() {
        let round = RoundSnapshot::new(
            healthy(),
            vec![],
            vec![
                Action::free(1, Values::hull_delta(dec!(2))),
                Action::free(2, Values::new(dec!(10), dec!(0), dec!(-5), dec!(0))),
                Action::free(3, Values::hull_delta(dec!(5))),
            ],
        );
        // overall: 2.4, 12 - 15 = -3, 6
        assert_eq!(run(&round, 3), vec![3, 1, 2]);
    }

    #[test]
    fn capacity_zero_selects_nothing() {
        let round = RoundSnapshot::new(
            Values::new(dec!(10), dec!(100), dec!(10), dec!(100)),
            vec![Effect::new(1, 1, Values::hull_delta(dec!(-50)))],
            vec![
                Action::blocking(1, 1, Values::default()),
                Action::free(2, Values::hull_delta(dec!(5))),
            ],
        );
        assert!(run(&round, 0).is_empty());
    }

    #[test]
    fn duplicate_action_ids_are_chosen_once() {
        let round = RoundSnapshot::new(
            healthy(),
            vec![],
            vec![
                Action::free(1, Values::hull_delta(dec!(2))),
                Action::free(1, Values::hull_delta(dec!(2))),
            ],
        );
        assert_eq!(run(&round, 5), vec![1]);
    }
}
