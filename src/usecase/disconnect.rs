//! UseCase: 接続切断処理
//!
//! トランスポートの close（明示的・強制を問わず）に対して 1 回だけ呼ばれ、
//! ルーム退出とレジストリからの削除をこの順で行います。二重呼び出しは
//! 安全に no-op になります。

use std::sync::Arc;

use crate::domain::{ConnectionId, Departure, RelayRepository};

/// 接続切断のユースケース
pub struct DisconnectUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RelayRepository>,
}

impl DisconnectUseCase {
    /// 新しい DisconnectUseCase を作成
    pub fn new(repository: Arc<dyn RelayRepository>) -> Self {
        Self { repository }
    }

    /// 接続切断を実行
    ///
    /// # Returns
    ///
    /// * `Some(Departure)` - 在室していた場合の退出情報（userLeft 通知に使用）
    /// * `None` - 未所属だった、または既にクリーンアップ済み
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Departure> {
        let departure = self.repository.leave_room(connection_id).await;
        self.repository.remove_connection(connection_id).await;
        departure
    }
}
