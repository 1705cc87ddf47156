//! Ports - 抽象化レイヤー
//!
//! 判定エンジンは純粋。外部とのやり取り（ゲームサーバー接続、実時間）は
//! ここの trait を通すので、テストではセッションループをインメモリ実装で動かせる。

pub mod clock;
pub mod transport;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::transport::{Transport, TransportError};
