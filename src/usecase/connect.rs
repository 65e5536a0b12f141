//! UseCase: 接続登録処理
//!
//! トランスポート接続ごとに 1 回呼ばれ、衝突耐性のある接続 ID を発行して
//! Connection Registry に初期状態を登録します。

use std::sync::Arc;

use crate::common::time::now_unix_millis;
use crate::domain::{ConnectionId, OutboundSender, RelayRepository, Timestamp};

/// 接続登録のユースケース
pub struct RegisterConnectionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RelayRepository>,
}

impl RegisterConnectionUseCase {
    /// 新しい RegisterConnectionUseCase を作成
    pub fn new(repository: Arc<dyn RelayRepository>) -> Self {
        Self { repository }
    }

    /// 接続登録を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - この接続の送信チャンネル
    ///
    /// # Returns
    ///
    /// 発行された接続 ID（`connected` エンベロープでクライアントへ通知される）
    pub async fn execute(&self, sender: OutboundSender) -> ConnectionId {
        let connected_at = Timestamp::new(now_unix_millis());
        self.repository
            .register_connection(sender, connected_at)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repository::InMemoryRelayRepository;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_register_connection() {
        // テスト項目: 接続が登録され、liveness の初期値が現在時刻になる
        // given (前提条件):
        let repository = Arc::new(InMemoryRelayRepository::new(50));
        let usecase = RegisterConnectionUseCase::new(repository.clone());
        let (sender, _receiver) = mpsc::unbounded_channel();
        let before = now_unix_millis();

        // when (操作):
        let id = usecase.execute(sender).await;

        // then (期待する結果):
        assert_eq!(repository.connection_count().await, 1);
        let last_pong = repository.last_pong(&id).await.unwrap();
        assert!(last_pong.value() >= before);
    }

    #[tokio::test]
    async fn test_register_generates_distinct_ids() {
        // テスト項目: 接続ごとに異なる ID が発行される
        // given (前提条件):
        let repository = Arc::new(InMemoryRelayRepository::new(50));
        let usecase = RegisterConnectionUseCase::new(repository.clone());
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        // when (操作):
        let a = usecase.execute(tx1).await;
        let b = usecase.execute(tx2).await;

        // then (期待する結果):
        assert_ne!(a, b);
        assert_eq!(repository.connection_count().await, 2);
    }
}
