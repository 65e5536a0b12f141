//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - ルーム参加処理（暗黙の退出、表示名解決、満室チェック）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：同一ルーム内で表示名が重複しない
//! - 満室時に membership が一切変更されないことを保証
//! - 別ルームへの参加時に旧ルームの退出情報が返ることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルーム・既存ルームへの参加
//! - 異常系：満室、無効なルーム ID、未登録の接続
//! - エッジケース：在室中の別ルームへの参加（暗黙の退出）

use std::sync::Arc;

use crate::domain::{
    ConnectionId, JoinOutcome, RelayRepository, RepositoryError, RoomId,
};

use super::error::JoinError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RelayRepository>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(repository: Arc<dyn RelayRepository>) -> Self {
        Self { repository }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 参加する接続の ID
    /// * `room_id` - 参加先ルーム ID（クライアント入力のまま）
    /// * `requested_name` - 希望する表示名（クライアント入力のまま）
    ///
    /// # Returns
    ///
    /// * `Ok(JoinOutcome)` - 解決済み表示名・人数・名簿・旧ルームの退出情報
    /// * `Err(JoinError)` - 満室または無効な入力
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: String,
        requested_name: String,
    ) -> Result<JoinOutcome, JoinError> {
        let room_id = RoomId::new(room_id).map_err(JoinError::InvalidRoomId)?;

        self.repository
            .join_room(connection_id, room_id, &requested_name)
            .await
            .map_err(|err| match err {
                RepositoryError::RoomFull { .. } => JoinError::RoomFull,
                RepositoryError::ConnectionNotFound(_) => JoinError::ConnectionGone,
            })
    }
}
