//! InMemoryTransport - テスト用のゲームサーバー接続
//!
//! # 学習ポイント
//! - tokio mpsc で双方向チャネルを組む
//! - サーバー側ハンドルを drop すると接続が閉じる

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::DescentError;
use crate::ports::{Transport, TransportError};
use crate::protocol::{ClientMessage, ServerMessage};

/// InMemoryTransport はクライアント側の端点
///
/// # 実装詳細
/// - inbound は JSON の生テキストを運ぶ（デコードは recv で行う）
/// - outbound は ClientMessage をそのまま運ぶ
///
/// # 使用例
/// ```ignore
/// let (transport, mut server) = InMemoryTransport::pair(16);
/// server.push(&ServerMessage::Warning { msg: "hi".into() }).await;
/// let reply = server.reply().await;
/// ```
pub struct InMemoryTransport {
    inbound: mpsc::Receiver<String>,
    outbound: mpsc::Sender<ClientMessage>,
}

/// ServerHandle はサーバー側の端点
pub struct ServerHandle {
    outbound: mpsc::Sender<String>,
    inbound: mpsc::Receiver<ClientMessage>,
}

impl InMemoryTransport {
    /// 接続の両端を作成
    pub fn pair(buffer: usize) -> (Self, ServerHandle) {
        let (to_client, from_server) = mpsc::channel(buffer);
        let (to_server, from_client) = mpsc::channel(buffer);
        (
            Self {
                inbound: from_server,
                outbound: to_server,
            },
            ServerHandle {
                outbound: to_client,
                inbound: from_client,
            },
        )
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn recv(&mut self) -> Result<Option<ServerMessage>, DescentError> {
        match self.inbound.recv().await {
            Some(line) => ServerMessage::from_json(&line).map(Some),
            None => Ok(None),
        }
    }

    async fn send(&mut self, message: ClientMessage) -> Result<(), DescentError> {
        self.outbound
            .send(message)
            .await
            .map_err(|_| TransportError::Closed.into())
    }
}

impl ServerHandle {
    /// メッセージを送信。クライアントが既に切断していれば false
    pub async fn push(&self, message: &ServerMessage) -> bool {
        match serde_json::to_string(message) {
            Ok(line) => self.push_raw(line).await,
            Err(_) => false,
        }
    }

    /// デコード前のテキストをそのまま送信
    pub async fn push_raw(&self, line: impl Into<String>) -> bool {
        self.outbound.send(line.into()).await.is_ok()
    }

    /// クライアントからの次の返信を待つ
    pub async fn reply(&mut self) -> Option<ClientMessage> {
        self.inbound.recv().await
    }

    /// 溜まっている返信を全て取り出す
    pub fn drain(&mut self) -> Vec<ClientMessage> {
        let mut replies = Vec::new();
        while let Ok(message) = self.inbound.try_recv() {
            replies.push(message);
        }
        replies
    }

    /// サーバー側から接続を閉じる
    pub fn close(self) -> mpsc::Receiver<ClientMessage> {
        self.inbound
    }
}
