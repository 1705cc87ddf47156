//! descent-core
//!
//! 潜水艦降下ゲームのラウンドごとの判定エンジン
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, values, snapshot, outcome, decision）
//! - **engine**: 判定パイプライン（classify → select → order → verify）と GreedyDecider
//! - **protocol**: サーバーとの JSON メッセージ
//! - **ports**: 抽象化レイヤー（Transport, Clock）
//! - **impls**: 実装（InMemoryTransport などテスト用）
//! - **app**: セッションループ（builder, config, session）
//! - **observability**: SessionSummary
//! - **error**: エラー型

pub mod app;
pub mod domain;
pub mod engine;
pub mod error;
pub mod impls;
pub mod observability;
pub mod ports;
pub mod protocol;

pub use self::app::{BuildError, Session, SessionBuilder, SessionConfig};
pub use self::domain::{Decider, Decision, RoundSnapshot};
pub use self::engine::{EngineConfig, GreedyDecider, TieredDecider};
pub use self::error::DescentError;
pub use self::observability::{SessionEnd, SessionSummary};
