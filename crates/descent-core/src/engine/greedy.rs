//! GreedyDecider - 1 パスの判定エンジン
//!
//! # 方針
//! - 全アクションを一度だけ順位付け（critical な blocker が先、次に net benefit）
//! - シミュレーション上の state が生きている間、その順に採用する
//!
//! TieredDecider が間に合わない、または空を返したときのフォールバックにも使う。

use std::cmp::Reverse;
use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::index::RoundIndex;
use super::verify::replay;
use crate::domain::{
    Action, ActionId, Decider, DeciderKind, Decision, DecisionReport, EffectId, RoundSnapshot,
    TierPicks, Values,
};

/// current hull の増加にかける重み
const HULL_PRIORITY: Decimal = dec!(1.2);

struct Evaluation<'a> {
    action: &'a Action,
    net_benefit: Decimal,
    critical: bool,
}

fn evaluate<'a>(action: &'a Action, index: &RoundIndex<'a>, current: &Values) -> Evaluation<'a> {
    let d = &action.values;
    let mut prevented = Decimal::ZERO;
    let mut critical = false;

    if let Some(effect) = index.target(action) {
        let e = &effect.values;
        prevented = (-e.hull()).saturating_sub(e.crew());
        critical = current.sum(e).is_dead();
    }

    let net_benefit = prevented
        .saturating_add(d.max_hull())
        .saturating_add(d.max_crew())
        .saturating_add(d.hull().saturating_mul(HULL_PRIORITY))
        .saturating_add(d.crew());

    Evaluation {
        action,
        net_benefit,
        critical,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyDecider;

impl GreedyDecider {
    pub fn new() -> Self {
        Self
    }
}

impl Decider for GreedyDecider {
    fn decide(&self, round: &RoundSnapshot, capacity: usize) -> Decision {
        let index = RoundIndex::build(round);

        let mut evaluations: Vec<Evaluation> = round
            .actions
            .iter()
            // 重複した id は最初のものだけ
            .filter(|a| index.action(a.id).is_some_and(|first| std::ptr::eq(first, *a)))
            .map(|a| evaluate(a, &index, &round.values))
            .collect();
        evaluations.sort_by_key(|e| (!e.critical, Reverse(e.net_benefit)));

        let mut rolling = round.values.clone();
        let mut stopped: HashSet<EffectId> = HashSet::new();
        let mut taken: HashSet<ActionId> = HashSet::new();
        let mut actions = Vec::new();
        let mut picks = TierPicks::default();

        for eval in &evaluations {
            if actions.len() >= capacity {
                break;
            }
            let action = eval.action;
            if action.effect_id.is_some_and(|id| stopped.contains(&id)) || taken.contains(&action.id) {
                continue;
            }

            let after = rolling.sum(&action.values);
            if after.is_dead() || !(eval.critical || eval.net_benefit > Decimal::ZERO) {
                continue;
            }

            rolling = after;
            taken.insert(action.id);
            actions.push(action.id);
            if let Some(id) = action.effect_id {
                stopped.insert(id);
            }
            if eval.critical {
                picks.critical_blocks += 1;
            } else {
                picks.fillers += 1;
            }
        }

        let mut critical_effects: Vec<EffectId> = Vec::new();
        for eval in evaluations.iter().filter(|e| e.critical) {
            if let Some(id) = eval.action.effect_id
                && !critical_effects.contains(&id)
            {
                critical_effects.push(id);
            }
        }
        let normal_effects = round
            .effects
            .iter()
            .map(|e| e.id)
            .filter(|id| !critical_effects.contains(id))
            .collect();
        let blocked_effects = round
            .effects
            .iter()
            .map(|e| e.id)
            .filter(|id| stopped.contains(id))
            .collect();

        let prediction = replay(&actions, round, &index);
        debug!(
            capacity,
            chosen = actions.len(),
            death_step = ?prediction.death_step,
            "greedy decision"
        );

        Decision {
            actions,
            report: DecisionReport {
                decider: DeciderKind::Greedy,
                capacity,
                critical_effects,
                normal_effects,
                blocked_effects,
                picks,
                critical_health: false,
                very_critical: false,
                healing_quota: 0,
                prediction,
                rejected: false,
            },
        }
    }

    fn kind(&self) -> DeciderKind {
        DeciderKind::Greedy
    }
}
