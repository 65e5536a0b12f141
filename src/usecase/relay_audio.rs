//! UseCase: 音声チャンク中継処理
//!
//! 音声データは不透明な base64 文字列として扱い、検証もデコードも行わずに
//! 送信者以外のルームメンバーへそのまま中継します。

use std::sync::Arc;

use crate::domain::{ConnectionId, RelayRepository, RoomId, Username};

/// 中継すべき音声チャンクのブロードキャスト内容
///
/// 送信者を除くルームメンバーへ `audio` エンベロープとして配送されます。
#[derive(Debug, Clone)]
pub struct AudioBroadcast {
    pub room_id: RoomId,
    pub username: Username,
    /// 不透明なペイロード（受信したバイト列をそのまま返す）
    pub content: String,
}

/// 音声チャンク中継のユースケース
pub struct RelayAudioUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RelayRepository>,
}

impl RelayAudioUseCase {
    /// 新しい RelayAudioUseCase を作成
    pub fn new(repository: Arc<dyn RelayRepository>) -> Self {
        Self { repository }
    }

    /// 音声チャンク中継を実行
    ///
    /// # Returns
    ///
    /// * `Some(AudioBroadcast)` - ブロードキャストすべき内容
    /// * `None` - 未所属のため無視された
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        content: String,
    ) -> Option<AudioBroadcast> {
        let membership = self.repository.membership_of(connection_id).await?;

        Some(AudioBroadcast {
            room_id: membership.room_id,
            username: membership.username,
            content,
        })
    }
}
