//! UseCase 層のエラー定義
//!
//! `JoinError` の `Display` 文字列はそのまま `error` エンベロープとして
//! クライアントへ返されます。

use thiserror::Error;

use crate::domain::ValueObjectError;

/// ルーム参加時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// 参加先ルームが満室
    #[error("Room is full")]
    RoomFull,

    /// ルーム ID が検証を通らなかった
    #[error("Invalid room id: {0}")]
    InvalidRoomId(ValueObjectError),

    /// 接続がレジストリに存在しない（クリーンアップ済み）
    #[error("Connection is not registered")]
    ConnectionGone,
}
