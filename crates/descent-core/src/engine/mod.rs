//! Engine - 判定パイプライン
//!
//! # ステージ（依存の少ない順）
//! - **score**: delta の self-harm / benefit / healing / overall
//! - **threat**: critical と normal の effect 分類
//! - **select**: capacity 内での 4 段階選択
//! - **order**: 期限を考慮した提出順
//! - **verify**: effect スケジュールに対する replay
//!
//! `TieredDecider` はこれらを順に実行し、`GreedyDecider` は 1 パスの代替。

pub mod config;
pub mod greedy;
pub mod index;
pub mod order;
pub mod score;
pub mod select;
pub mod threat;
pub mod tiered;
pub mod verify;

pub use self::config::{ConfigError, EngineConfig, ScoreWeights, VerifyPolicy};
pub use self::greedy::GreedyDecider;
pub use self::index::RoundIndex;
pub use self::tiered::TieredDecider;
pub use self::verify::{Verdict, replay, verify};
