//! Domain identifiers（型安全な ID）
//!
//! サーバーは round, effect, action の ID を整数で渡してくる。
//! `Id<T>` はその整数を phantom marker で包み、effect id を
//! action id の位置に渡せないようにする。
//!
//! ## Phantom Type パターン
//! `T` は実行時には使わない（PhantomData）マーカー型で、
//! コンパイル時の型安全性だけを提供します。

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"effect-", "action-", "round-"）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// 汎用の整数 ID
///
/// ワイヤ形式に合わせ、生の整数としてそのまま serialize する。
#[repr(transparent)]
pub struct Id<T: IdMarker> {
    raw: i64,
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub const fn new(raw: i64) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    pub const fn get(self) -> i64 {
        self.raw
    }
}

// derive だと T にも bound が付いてしまうので手書きする
impl<T: IdMarker> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: IdMarker> Copy for Id<T> {}

impl<T: IdMarker> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T: IdMarker> Eq for Id<T> {}

impl<T: IdMarker> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: IdMarker> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T: IdMarker> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T: IdMarker> From<i64> for Id<T> {
    fn from(raw: i64) -> Self {
        Self::new(raw)
    }
}

impl<T: IdMarker> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.raw)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.raw)
    }
}

impl<T: IdMarker> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.raw)
    }
}

impl<'de, T: IdMarker> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::new)
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// Effect のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Effect {}

impl IdMarker for Effect {
    fn prefix() -> &'static str {
        "effect-"
    }
}

/// Action のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {}

impl IdMarker for Action {
    fn prefix() -> &'static str {
        "action-"
    }
}

/// Round のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Round {}

impl IdMarker for Round {
    fn prefix() -> &'static str {
        "round-"
    }
}

/// 予定された hazard（effect）の ID
pub type EffectId = Id<Effect>;

/// 提出できるアクションの ID
pub type ActionId = Id<Action>;

/// ラウンドの ID（選択と一緒にそのまま返す）
pub type RoundId = Id<Round>;
