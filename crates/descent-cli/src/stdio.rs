//! LineTransport - 非同期 reader/writer 上の JSON-lines 接続
//!
//! 本番では stdin/stdout を使う。

use async_trait::async_trait;
use descent_core::DescentError;
use descent_core::ports::{Transport, TransportError};
use descent_core::protocol::{ClientMessage, ServerMessage};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};

pub struct LineTransport<R, W> {
    lines: Lines<R>,
    writer: W,
}

impl LineTransport<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R: AsyncBufRead + Unpin, W: AsyncWrite + Unpin> LineTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            lines: reader.lines(),
            writer,
        }
    }
}

#[async_trait]
impl<R, W> Transport for LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn recv(&mut self) -> Result<Option<ServerMessage>, DescentError> {
        loop {
            let Some(line) = self.lines.next_line().await.map_err(TransportError::from)? else {
                return Ok(None);
            };
            if line.trim().is_empty() {
                continue;
            }
            return ServerMessage::from_json(&line).map(Some);
        }
    }

    async fn send(&mut self, message: ClientMessage) -> Result<(), DescentError> {
        let mut line = message.to_json()?;
        line.push('\n');
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(TransportError::from)?;
        self.writer.flush().await.map_err(TransportError::from)?;
        Ok(())
    }
}
