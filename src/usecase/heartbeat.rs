//! UseCase: 生存監視（heartbeat）処理
//!
//! 接続ごとの監視タスクから呼ばれます。pong の記録と、最終 ack からの
//! 経過時間の判定のみを担い、実際の切断はトランスポート側で行います。

use std::sync::Arc;
use std::time::Duration;

use crate::common::time::now_unix_millis;
use crate::domain::{ConnectionId, RelayRepository, Timestamp};

/// 生存判定の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    /// ack が期限内に届いている
    Alive,
    /// ack が 2 インターバル分届いていない（強制切断の対象）
    Stale,
    /// 接続がレジストリに存在しない（監視タスクの終了対象）
    Gone,
}

/// 生存監視のユースケース
pub struct HeartbeatUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RelayRepository>,
}

impl HeartbeatUseCase {
    /// 新しい HeartbeatUseCase を作成
    pub fn new(repository: Arc<dyn RelayRepository>) -> Self {
        Self { repository }
    }

    /// pong（heartbeat ack）を記録
    pub async fn record_pong(&self, connection_id: &ConnectionId) {
        self.repository
            .record_pong(connection_id, Timestamp::new(now_unix_millis()))
            .await;
    }

    /// 最終 ack からの経過時間を判定
    ///
    /// 経過時間がインターバルの 2 倍を超えた接続は Stale と判定されます。
    pub async fn check(&self, connection_id: &ConnectionId, interval: Duration) -> Liveness {
        let Some(last_pong) = self.repository.last_pong(connection_id).await else {
            return Liveness::Gone;
        };

        let elapsed_ms = now_unix_millis() - last_pong.value();
        if elapsed_ms > 2 * interval.as_millis() as i64 {
            Liveness::Stale
        } else {
            Liveness::Alive
        }
    }
}
