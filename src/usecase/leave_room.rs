//! UseCase: ルーム退出処理
//!
//! 明示的な `leave` エンベロープに対応します。接続自体は維持されるため、
//! レジストリからの削除は行いません（切断時は `DisconnectUseCase`）。

use std::sync::Arc;

use crate::domain::{ConnectionId, Departure, RelayRepository};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RelayRepository>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(repository: Arc<dyn RelayRepository>) -> Self {
        Self { repository }
    }

    /// ルーム退出を実行
    ///
    /// # Returns
    ///
    /// * `Some(Departure)` - 退出したルームと残り人数（userLeft 通知に使用）
    /// * `None` - 未所属または未登録（no-op）
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Departure> {
        self.repository.leave_room(connection_id).await
    }
}
