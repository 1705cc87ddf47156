//! App - アプリケーション層
//!
//! このモジュールは、ports と engine を組み合わせてゲーム接続を処理します。
//!
//! # 主要コンポーネント
//! - **SessionConfig**: 上限・予算・フォールバックの設定
//! - **SessionBuilder**: セッションの構築と起動時検証
//! - **Session**: ラウンド応答ループ（recv→decide→send）

pub mod builder;
pub mod config;
pub mod session;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, SessionBuilder};
pub use self::config::SessionConfig;
pub use self::session::Session;
