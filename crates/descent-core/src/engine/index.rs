//! RoundIndex - スナップショットの検索テーブル
//!
//! 判定ごとに作り直し、判定の終わりに捨てる。借用したスナップショットより長くは生きない。

use std::collections::HashMap;

use crate::domain::{Action, ActionId, Effect, EffectId, RoundSnapshot};

/// 1 つのスナップショットに対する検索
///
/// id が重複したら最初のものが勝つ。
pub struct RoundIndex<'a> {
    effects: HashMap<EffectId, &'a Effect>,
    actions: HashMap<ActionId, &'a Action>,
    by_effect: HashMap<EffectId, Vec<&'a Action>>,
    free: Vec<&'a Action>,
}

impl<'a> RoundIndex<'a> {
    pub fn build(round: &'a RoundSnapshot) -> Self {
        let mut effects = HashMap::with_capacity(round.effects.len());
        for effect in &round.effects {
            effects.entry(effect.id).or_insert(effect);
        }

        let mut actions = HashMap::with_capacity(round.actions.len());
        let mut by_effect: HashMap<EffectId, Vec<&'a Action>> = HashMap::new();
        let mut free = Vec::new();
        for action in &round.actions {
            if actions.contains_key(&action.id) {
                continue;
            }
            actions.insert(action.id, action);
            // 未知の effect への参照は free action 扱い
            match action.effect_id.filter(|id| effects.contains_key(id)) {
                Some(effect_id) => by_effect.entry(effect_id).or_default().push(action),
                None => free.push(action),
            }
        }

        Self {
            effects,
            actions,
            by_effect,
            free,
        }
    }

    pub fn effect(&self, id: EffectId) -> Option<&'a Effect> {
        self.effects.get(&id).copied()
    }

    pub fn action(&self, id: ActionId) -> Option<&'a Action> {
        self.actions.get(&id).copied()
    }

    /// `effect` に対抗するアクション（スナップショット順）
    pub fn candidates(&self, effect: EffectId) -> &[&'a Action] {
        self.by_effect.get(&effect).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 既知の effect に紐づかないアクション（スナップショット順）
    pub fn free_actions(&self) -> &[&'a Action] {
        &self.free
    }

    /// アクションが対抗する既知の effect
    pub fn target(&self, action: &Action) -> Option<&'a Effect> {
        action.effect_id.and_then(|id| self.effect(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Values;
    use rust_decimal_macros::dec;

    fn round() -> RoundSnapshot {
        RoundSnapshot::new(
            Values::new(dec!(50), dec!(100), dec!(50), dec!(100)),
            vec![Effect::new(1, 1, Values::hull_delta(dec!(-10)))],
            vec![
                Action::blocking(10, 1, Values::default()),
                Action::blocking(11, 99, Values::default()),
                Action::free(12, Values::hull_delta(dec!(5))),
            ],
        )
    }

    #[test]
    fn unknown_effect_reference_is_free() {
        let round = round();
        let index = RoundIndex::build(&round);

        let free: Vec<_> = index.free_actions().iter().map(|a| a.id.get()).collect();
        assert_eq!(free, vec![11, 12]);
        assert_eq!(index.candidates(EffectId::new(1)).len(), 1);
        assert!(index.candidates(EffectId::new(99)).is_empty());
    }

    #[test]
    fn target_resolves_known_effects_only() {
        let round = round();
        let index = RoundIndex::build(&round);

        let known = index.action(ActionId::new(10)).unwrap();
        let unknown = index.action(ActionId::new(11)).unwrap();
        assert_eq!(index.target(known).map(|e| e.step), Some(1));
        assert!(index.target(unknown).is_none());
    }

    #[test]
    fn first_duplicate_action_wins() {
        let mut round = round();
        round.actions.push(Action::free(12, Values::hull_delta(dec!(99))));
        let index = RoundIndex::build(&round);

        let a = index.action(ActionId::new(12)).unwrap();
        assert_eq!(a.values.hull(), dec!(5));
        assert_eq!(index.free_actions().len(), 2);
    }
}
