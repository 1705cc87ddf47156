//! Transport port - ゲームサーバーとの接続
//!
//! 接続のライフサイクルとフレーミングはこの trait の裏に隠す。
//! セッションが見るのはデコード済みのメッセージだけ。

use async_trait::async_trait;

use crate::error::DescentError;
use crate::protocol::{ClientMessage, ServerMessage};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection closed")]
    Closed,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Transport は server message を受け取り、client message を送る
///
/// # 設計原則
/// - サーバー側が消えたら `recv` は `Ok(None)` を返す
/// - デコードできないメッセージは `Err(DescentError::Codec)`。
///   呼び出し側は読み飛ばして続行してよい
#[async_trait]
pub trait Transport: Send {
    async fn recv(&mut self) -> Result<Option<ServerMessage>, DescentError>;

    async fn send(&mut self, message: ClientMessage) -> Result<(), DescentError>;
}
