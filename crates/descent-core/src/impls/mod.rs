//! Impls - 実装（開発用・テスト用）
//!
//! このモジュールには ports の実装を含めます。
//!
//! # 含まれる実装
//! - **InMemoryTransport**: チャネルで繋いだゲームサーバー接続
//!
//! # 本番用実装
//! 標準入出力の JSON-lines 接続は `descent-cli` に置きます。

pub mod inmem_transport;

pub use self::inmem_transport::{InMemoryTransport, ServerHandle};
