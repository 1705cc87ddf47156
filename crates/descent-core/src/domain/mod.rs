//! Domain - ドメインモデル（ids, vitals, round snapshot, decision, prediction）

pub mod decision;
pub mod ids;
pub mod outcome;
pub mod snapshot;
pub mod values;

pub use decision::{Decider, DeciderKind, Decision, DecisionReport, TierPicks};
pub use ids::{ActionId, EffectId, Id, IdMarker, RoundId};
pub use outcome::{OutcomeKind, Prediction};
pub use snapshot::{Action, Effect, RoundSnapshot};
pub use values::Values;
