//! Order - 提出順の決定
//!
//! # 方針
//! - blocker は対象 effect の step までに出す（間に合う限り）
//! - critical な blocker が間に合わなくなるなら normal な blocker は後回し
//! - rolling state が hazard threshold を下回る間は回復を先に出す。
//!   ただし期限内の blocker を遅らせない場合に限る
//! - 最適なスケジュールではなく、貪欲法

use std::cmp::Reverse;
use std::collections::{HashSet, VecDeque};

use super::config::EngineConfig;
use super::index::RoundIndex;
use super::score::{benefit, healing, is_healing};
use crate::domain::{Action, EffectId, Values};

/// 対抗アクション: 対象 effect の step と、critical かどうか
struct Blocker<'a> {
    action: &'a Action,
    step: usize,
    critical: bool,
}

struct Queues<'a> {
    blocking: VecDeque<Blocker<'a>>,
    healing: VecDeque<&'a Action>,
    other: VecDeque<&'a Action>,
}

fn partition<'a>(
    chosen: &[&'a Action],
    index: &RoundIndex<'a>,
    critical: &HashSet<EffectId>,
    config: &EngineConfig,
) -> Queues<'a> {
    let mut blocking = Vec::new();
    let mut heals = Vec::new();
    let mut other = Vec::new();
    for &action in chosen {
        if let Some(effect) = index.target(action) {
            blocking.push(Blocker {
                action,
                step: effect.step as usize,
                critical: critical.contains(&effect.id),
            });
        } else if is_healing(&action.values) {
            heals.push(action);
        } else {
            other.push(action);
        }
    }

    blocking.sort_by_key(|b| b.step);
    heals.sort_by_key(|a| Reverse(healing(&a.values)));
    other.sort_by_key(|a| Reverse(benefit(&a.values, &config.weights)));

    Queues {
        blocking: blocking.into(),
        healing: heals.into(),
        other: other.into(),
    }
}

impl<'a> Queues<'a> {
    /// 期限内の blocker を `position` から詰めて並べたとき、
    /// どれかが丁度 step に当たるなら true（他を先に入れると間に合わない）
    ///
    /// `critical_only` なら critical な blocker だけを数える。
    fn deadline_is_tight(&self, position: usize, critical_only: bool) -> bool {
        self.blocking
            .iter()
            .filter(|b| b.step >= position && (b.critical || !critical_only))
            .enumerate()
            .any(|(i, b)| position + i == b.step)
    }

    /// 期限内の blocker のうち次に出すもの
    ///
    /// critical な blocker に余裕がなければ、手前の normal を飛ばしてそれを出す。
    fn next_blocker(&mut self, position: usize) -> Option<&'a Action> {
        let urgent = self.deadline_is_tight(position, true);
        let at = self
            .blocking
            .iter()
            .position(|b| b.step >= position && (b.critical || !urgent))?;
        self.blocking.remove(at).map(|b| b.action)
    }

    /// 現在位置と回復の要否から次のアクションを選ぶ
    fn next(&mut self, position: usize, needs_healing: bool) -> Option<&'a Action> {
        if needs_healing
            && !self.deadline_is_tight(position, false)
            && let Some(heal) = self.healing.pop_front()
        {
            return Some(heal);
        }

        if let Some(blocker) = self.next_blocker(position) {
            return Some(blocker);
        }

        // 残りの blocker は全て手遅れ: 先に filler を使う
        if let Some(filler) = self.healing.pop_front().or_else(|| self.other.pop_front()) {
            return Some(filler);
        }
        self.blocking.pop_front().map(|b| b.action)
    }
}

/// `chosen` を最大 `capacity` 件、重複なしで並べる
///
/// `critical` は critical な effect の id。両方は間に合わないとき、
/// その blocker が normal な blocker より先に枠を取る。
pub fn build_order<'a>(
    chosen: &[&'a Action],
    index: &RoundIndex<'a>,
    critical: &HashSet<EffectId>,
    start: &Values,
    capacity: usize,
    config: &EngineConfig,
) -> Vec<&'a Action> {
    let mut queues = partition(chosen, index, critical, config);
    let limit = capacity.min(chosen.len());

    let mut ordered: Vec<&Action> = Vec::with_capacity(limit);
    let mut seen = HashSet::with_capacity(limit);
    let mut rolling = start.clone();
    let mut needs_healing = rolling.is_low(config.hazard_threshold, config.ratio_scale);

    while ordered.len() < limit {
        let Some(action) = queues.next(ordered.len() + 1, needs_healing) else {
            break;
        };
        if !seen.insert(action.id) {
            continue;
        }
        ordered.push(action);
        rolling = rolling.sum(&action.values);
        needs_healing = rolling.is_low(config.hazard_threshold, config.ratio_scale);
    }
    ordered
}
