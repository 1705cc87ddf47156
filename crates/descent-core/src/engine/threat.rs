//! Threat - effect の危険度分類
//!
//! 各 effect は他と積み上げず、単体で current vitals に対して判定する。

use std::cmp::Reverse;

use super::config::EngineConfig;
use super::score::self_harm;
use crate::domain::{Effect, Values};

/// 単体での危険度で分けた effect
///
/// どちらも step 順、同じ step ならダメージの大きい順。
#[derive(Debug, Default)]
pub struct Threats<'a> {
    pub critical: Vec<&'a Effect>,
    pub normal: Vec<&'a Effect>,
}

/// effect 単体で死亡するか、vital が hazard threshold を下回るなら critical
pub fn is_critical(current: &Values, effect: &Effect, config: &EngineConfig) -> bool {
    let after = current.sum(&effect.values);
    after.is_dead() || after.is_low(config.hazard_threshold, config.ratio_scale)
}

pub fn classify<'a>(current: &Values, effects: &'a [Effect], config: &EngineConfig) -> Threats<'a> {
    let (mut critical, mut normal): (Vec<&Effect>, Vec<&Effect>) = effects
        .iter()
        .partition(|effect| is_critical(current, effect, config));

    critical.sort_by_key(|e| (e.step, Reverse(self_harm(&e.values))));
    normal.sort_by_key(|e| (e.step, Reverse(self_harm(&e.values))));

    Threats { critical, normal }
}
