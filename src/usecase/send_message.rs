//! UseCase: チャットメッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージ送信処理（在室チェック、内容の検証と切り詰め、タイムスタンプ付与）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：空メッセージと未所属の接続は無視される
//! - 1000 文字を超える内容が切り詰められることを保証
//! - サーバ側タイムスタンプが付与されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：在室中の接続からのメッセージ送信
//! - 異常系：未所属、空白のみの内容
//! - エッジケース：上限を超える長さの内容

use std::sync::Arc;

use crate::common::time::now_unix_millis;
use crate::domain::{
    ConnectionId, MessageContent, RelayRepository, RoomId, Timestamp, Username,
};

/// 送信が受理されたチャットメッセージのブロードキャスト内容
///
/// 送信者を含むルーム全員へ `message` エンベロープとして配送されます。
#[derive(Debug, Clone)]
pub struct MessageBroadcast {
    pub room_id: RoomId,
    pub username: Username,
    pub content: MessageContent,
    pub timestamp: Timestamp,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RelayRepository>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(repository: Arc<dyn RelayRepository>) -> Self {
        Self { repository }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 送信者の接続 ID
    /// * `content` - メッセージ内容（クライアント入力のまま）
    ///
    /// # Returns
    ///
    /// * `Some(MessageBroadcast)` - ブロードキャストすべき内容
    /// * `None` - 無視された（未所属、または空白のみの内容）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        content: String,
    ) -> Option<MessageBroadcast> {
        let content = MessageContent::new(content).ok()?;
        let membership = self.repository.membership_of(connection_id).await?;

        Some(MessageBroadcast {
            room_id: membership.room_id,
            username: membership.username,
            content,
            timestamp: Timestamp::new(now_unix_millis()),
        })
    }
}
