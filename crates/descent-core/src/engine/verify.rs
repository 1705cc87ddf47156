//! Verify - effect スケジュールに対する sequence の replay
//!
//! # ルール
//! - step `s` では、まず位置 `s` のアクションを適用する
//! - 次に step `s` の effect のうち、位置 `<= s` のアクションで対抗されていないものを適用する
//! - step 0 の effect は最初のアクションより前に発動し、対抗できない

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::config::VerifyPolicy;
use super::index::RoundIndex;
use crate::domain::{ActionId, Effect, EffectId, Prediction, RoundSnapshot};

/// 検証後の sequence
#[derive(Debug, Clone)]
pub struct Verdict {
    pub actions: Vec<ActionId>,
    pub prediction: Prediction,
    pub rejected: bool,
}

/// effect ごとに、`sequence` 中で最初に対抗するアクションの位置（1 始まり）
fn first_counters(sequence: &[ActionId], index: &RoundIndex<'_>) -> HashMap<EffectId, usize> {
    let mut counters = HashMap::new();
    for (i, id) in sequence.iter().enumerate() {
        if let Some(effect) = index.action(*id).and_then(|a| a.effect_id) {
            counters.entry(effect).or_insert(i + 1);
        }
    }
    counters
}

/// アクションか effect のある step だけを回る（遠い step でもコストは増えない）
pub fn replay(sequence: &[ActionId], round: &RoundSnapshot, index: &RoundIndex<'_>) -> Prediction {
    let counters = first_counters(sequence, index);

    let mut schedule: BTreeMap<usize, Vec<&Effect>> = BTreeMap::new();
    for effect in &round.effects {
        schedule.entry(effect.step as usize).or_default().push(effect);
    }
    let mut steps: BTreeSet<usize> = schedule.keys().copied().collect();
    steps.extend(1..=sequence.len());

    let mut state = round.values.clone();
    let mut death_step = None;
    let mut unblocked = Vec::new();

    for step in steps {
        let action = step
            .checked_sub(1)
            .and_then(|i| sequence.get(i))
            .and_then(|id| index.action(*id));
        if let Some(action) = action {
            state = state.sum(&action.values);
            if death_step.is_none() && state.is_dead() {
                death_step = Some(step as u32);
            }
        }

        for effect in schedule.get(&step).into_iter().flatten() {
            let countered = counters.get(&effect.id).is_some_and(|pos| *pos <= step);
            if !countered {
                state = state.sum(&effect.values);
                unblocked.push(effect.id);
                if death_step.is_none() && state.is_dead() {
                    death_step = Some(step as u32);
                }
            }
        }
    }

    Prediction {
        final_values: state,
        death_step,
        unblocked,
    }
}

/// `sequence` を replay して policy を適用
///
/// `AlwaysAttempt` なら sequence はそのまま返る。
pub fn verify(
    sequence: Vec<ActionId>,
    round: &RoundSnapshot,
    index: &RoundIndex<'_>,
    policy: VerifyPolicy,
) -> Verdict {
    let prediction = replay(&sequence, round, index);

    let rejected =
        policy == VerifyPolicy::RejectOnDeath && !sequence.is_empty() && !prediction.survives();
    let actions = if rejected { Vec::new() } else { sequence };

    Verdict {
        actions,
        prediction,
        rejected,
    }
}
