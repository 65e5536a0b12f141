//! InMemory Relay Repository 実装
//!
//! ドメイン層が定義する RelayRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します（依存性の逆転）。
//!
//! Connection Registry と Room Directory を 1 つの Mutex で保護し、
//! join / leave / register / remove の変更操作を直列化します。
//! 想定規模（数十ルーム × 数十メンバー）では粗いロックで十分です。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Connection, ConnectionId, ConnectionIdFactory, Departure, JoinOutcome, Membership,
    OutboundSender, RelayRepository, RepositoryError, Room, RoomError, RoomId, RoomSummary,
    Timestamp, Username,
};

/// 接続 1 本分のレジストリエントリ
struct ConnectionEntry {
    /// ドメインモデル（membership と liveness を保持）
    connection: Connection,
    /// この接続の送信チャンネル
    sender: OutboundSender,
}

/// レジストリとルームディレクトリの共有状態
#[derive(Default)]
struct RelayState {
    connections: HashMap<ConnectionId, ConnectionEntry>,
    rooms: HashMap<RoomId, Room>,
}

/// インメモリ Relay Repository 実装
///
/// サーバ起動時に明示的に構築され、`Arc<dyn RelayRepository>` として
/// 接続ハンドラへ渡されます（プロセス全体のシングルトンにはしない）。
pub struct InMemoryRelayRepository {
    state: Mutex<RelayState>,
    room_capacity: usize,
}

impl InMemoryRelayRepository {
    /// 新しい InMemoryRelayRepository を作成
    pub fn new(room_capacity: usize) -> Self {
        Self {
            state: Mutex::new(RelayState::default()),
            room_capacity,
        }
    }

    /// 現在のルームから退出させ、空になったルームを削除する。
    /// 未登録・未所属の場合は None を返すだけで何もしない。
    fn do_leave(state: &mut RelayState, id: &ConnectionId) -> Option<Departure> {
        let entry = state.connections.get_mut(id)?;
        let membership = entry.connection.leave_room()?;

        let mut user_count = 0;
        if let Some(room) = state.rooms.get_mut(&membership.room_id) {
            room.remove_member(id);
            user_count = room.member_count();
            if room.is_empty() {
                state.rooms.remove(&membership.room_id);
            }
        }

        Some(Departure {
            room_id: membership.room_id,
            username: membership.username,
            user_count,
        })
    }

    /// ルームの現メンバーの表示名を収集する
    fn member_names(state: &RelayState, members: &[ConnectionId]) -> Vec<Username> {
        members
            .iter()
            .filter_map(|member| {
                state
                    .connections
                    .get(member)
                    .and_then(|entry| entry.connection.membership.as_ref())
                    .map(|membership| membership.username.clone())
            })
            .collect()
    }
}

#[async_trait]
impl RelayRepository for InMemoryRelayRepository {
    async fn register_connection(
        &self,
        sender: OutboundSender,
        connected_at: Timestamp,
    ) -> ConnectionId {
        let id = ConnectionIdFactory::generate();
        let mut state = self.state.lock().await;
        state.connections.insert(
            id.clone(),
            ConnectionEntry {
                connection: Connection::new(id.clone(), connected_at),
                sender,
            },
        );
        id
    }

    async fn remove_connection(&self, id: &ConnectionId) {
        let mut state = self.state.lock().await;
        let state = &mut *state;
        // 退出漏れがあってもここでルームから消す（ブロードキャストは伴わない）
        Self::do_leave(state, id);
        state.connections.remove(id);
    }

    async fn join_room(
        &self,
        id: &ConnectionId,
        room_id: RoomId,
        requested_name: &str,
    ) -> Result<JoinOutcome, RepositoryError> {
        let mut state = self.state.lock().await;
        let state = &mut *state;

        if !state.connections.contains_key(id) {
            return Err(RepositoryError::ConnectionNotFound(id.as_str().to_string()));
        }

        // 満室チェックは一切の状態変更より前に行う
        let target_full = state
            .rooms
            .get(&room_id)
            .map_or(self.room_capacity == 0, Room::is_full);
        if target_full {
            let capacity = state
                .rooms
                .get(&room_id)
                .map_or(self.room_capacity, |room| room.capacity);
            return Err(RepositoryError::RoomFull { capacity });
        }

        let departure = Self::do_leave(state, id);

        // 表示名の一意性は参加先ルームのメンバーに対してのみ保証する
        let existing = match state.rooms.get(&room_id) {
            Some(room) => Self::member_names(state, &room.members),
            None => Vec::new(),
        };
        let username = Username::resolve(requested_name, &existing);

        let capacity = self.room_capacity;
        let room = state
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id.clone(), capacity));
        room.add_member(id.clone())
            .map_err(|RoomError::Full { capacity }| RepositoryError::RoomFull { capacity })?;
        let user_count = room.member_count();
        let members = room.members.clone();

        if let Some(entry) = state.connections.get_mut(id) {
            entry
                .connection
                .enter_room(room_id.clone(), username.clone());
        }
        let roster = Self::member_names(state, &members);

        Ok(JoinOutcome {
            departure,
            room_id,
            username,
            user_count,
            roster,
        })
    }

    async fn leave_room(&self, id: &ConnectionId) -> Option<Departure> {
        let mut state = self.state.lock().await;
        Self::do_leave(&mut state, id)
    }

    async fn membership_of(&self, id: &ConnectionId) -> Option<Membership> {
        let state = self.state.lock().await;
        state
            .connections
            .get(id)
            .and_then(|entry| entry.connection.membership.clone())
    }

    async fn record_pong(&self, id: &ConnectionId, at: Timestamp) {
        let mut state = self.state.lock().await;
        if let Some(entry) = state.connections.get_mut(id) {
            entry.connection.last_pong = at;
        }
    }

    async fn last_pong(&self, id: &ConnectionId) -> Option<Timestamp> {
        let state = self.state.lock().await;
        state
            .connections
            .get(id)
            .map(|entry| entry.connection.last_pong)
    }

    async fn broadcast_targets(
        &self,
        room_id: &RoomId,
        exclude: Option<&ConnectionId>,
    ) -> Vec<(ConnectionId, OutboundSender)> {
        let state = self.state.lock().await;
        let Some(room) = state.rooms.get(room_id) else {
            return Vec::new();
        };
        room.members
            .iter()
            .filter(|member| Some(*member) != exclude)
            .filter_map(|member| {
                state
                    .connections
                    .get(member)
                    .map(|entry| (member.clone(), entry.sender.clone()))
            })
            .collect()
    }

    async fn connection_count(&self) -> usize {
        let state = self.state.lock().await;
        state.connections.len()
    }

    async fn member_count(&self, room_id: &RoomId) -> Option<usize> {
        let state = self.state.lock().await;
        state.rooms.get(room_id).map(Room::member_count)
    }

    async fn room_summaries(&self) -> Vec<RoomSummary> {
        let state = self.state.lock().await;
        state
            .rooms
            .values()
            .map(|room| RoomSummary {
                id: room.id.clone(),
                user_count: room.member_count(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryRelayRepository の join / leave / register / remove 操作
    // - 表示名の一意性解決（参加先ルーム内のみ）
    // - 空ルームの即時削除（ディレクトリ不変条件）
    // - 満室時に状態が一切変わらないこと
    //
    // 【なぜこのテストが必要か】
    // - Repository は全接続ハンドラが共有するデータアクセス層の中核
    // - ルームディレクトリの不変条件（空ルームは存在しない）を保証する
    // - UseCase 層が Repository に依存できるよう、信頼性を担保する
    // ========================================

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    async fn register(repo: &InMemoryRelayRepository) -> ConnectionId {
        let (sender, _receiver) = mpsc::unbounded_channel();
        repo.register_connection(sender, Timestamp::new(0)).await
    }

    #[tokio::test]
    async fn test_register_and_remove_connection() {
        // テスト項目: 接続の登録と削除がレジストリに反映される
        // given (前提条件):
        let repo = InMemoryRelayRepository::new(50);

        // when (操作):
        let id = register(&repo).await;

        // then (期待する結果):
        assert_eq!(repo.connection_count().await, 1);
        assert_eq!(repo.last_pong(&id).await, Some(Timestamp::new(0)));

        // when (操作): 削除（2 回目は no-op）
        repo.remove_connection(&id).await;
        repo.remove_connection(&id).await;

        // then (期待する結果):
        assert_eq!(repo.connection_count().await, 0);
        assert_eq!(repo.last_pong(&id).await, None);
    }

    #[tokio::test]
    async fn test_join_room_creates_room_lazily() {
        // テスト項目: 初回 join でルームが作成され、メンバーと名簿が返る
        // given (前提条件):
        let repo = InMemoryRelayRepository::new(50);
        let alice = register(&repo).await;

        // when (操作):
        let outcome = repo
            .join_room(&alice, room_id("abc"), "Alice")
            .await
            .unwrap();

        // then (期待する結果):
        assert!(outcome.departure.is_none());
        assert_eq!(outcome.username.as_str(), "Alice");
        assert_eq!(outcome.user_count, 1);
        assert_eq!(outcome.roster, vec![Username::sanitize("Alice")]);
        assert_eq!(repo.member_count(&room_id("abc")).await, Some(1));
    }

    #[tokio::test]
    async fn test_join_room_resolves_duplicate_username() {
        // テスト項目: 同名で join すると連番付きの表示名が割り当てられる
        // given (前提条件): Alice が room abc に参加済み
        let repo = InMemoryRelayRepository::new(50);
        let alice = register(&repo).await;
        let bob = register(&repo).await;
        repo.join_room(&alice, room_id("abc"), "Alice")
            .await
            .unwrap();

        // when (操作): 2 人目も "Alice" を要求する
        let outcome = repo.join_room(&bob, room_id("abc"), "Alice").await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome.username.as_str(), "Alice1");
        assert_eq!(outcome.user_count, 2);
        assert_eq!(
            outcome.roster,
            vec![Username::sanitize("Alice"), Username::sanitize("Alice1")]
        );
    }

    #[tokio::test]
    async fn test_join_room_username_unique_per_room_only() {
        // テスト項目: 表示名の一意性は同一ルーム内に限られる
        // given (前提条件): Alice が room abc に参加済み
        let repo = InMemoryRelayRepository::new(50);
        let alice = register(&repo).await;
        let bob = register(&repo).await;
        repo.join_room(&alice, room_id("abc"), "Alice")
            .await
            .unwrap();

        // when (操作): 別ルームで同じ名前を要求する
        let outcome = repo.join_room(&bob, room_id("xyz"), "Alice").await.unwrap();

        // then (期待する結果): 連番は付かない
        assert_eq!(outcome.username.as_str(), "Alice");
    }

    #[tokio::test]
    async fn test_join_full_room_changes_nothing() {
        // テスト項目: 満室のルームへの join は membership を一切変更しない
        // given (前提条件): 定員 1 のルームに Alice が参加済み
        let repo = InMemoryRelayRepository::new(1);
        let alice = register(&repo).await;
        let bob = register(&repo).await;
        repo.join_room(&alice, room_id("abc"), "Alice")
            .await
            .unwrap();

        // when (操作):
        let result = repo.join_room(&bob, room_id("abc"), "Bob").await;

        // then (期待する結果): エラーが返り、Bob は未所属のまま
        assert_eq!(result.unwrap_err(), RepositoryError::RoomFull { capacity: 1 });
        assert_eq!(repo.member_count(&room_id("abc")).await, Some(1));
        assert_eq!(repo.membership_of(&bob).await, None);
    }

    #[tokio::test]
    async fn test_join_switches_room_with_departure() {
        // テスト項目: 別ルームへの join は暗黙の退出を伴う
        // given (前提条件): Alice が room abc に 1 人で参加済み
        let repo = InMemoryRelayRepository::new(50);
        let alice = register(&repo).await;
        repo.join_room(&alice, room_id("abc"), "Alice")
            .await
            .unwrap();

        // when (操作): room xyz へ join する
        let outcome = repo.join_room(&alice, room_id("xyz"), "Alice").await.unwrap();

        // then (期待する結果): 旧ルームの退出情報が返り、空になった abc は削除される
        let departure = outcome.departure.unwrap();
        assert_eq!(departure.room_id, room_id("abc"));
        assert_eq!(departure.username.as_str(), "Alice");
        assert_eq!(departure.user_count, 0);
        assert_eq!(repo.member_count(&room_id("abc")).await, None);
        assert_eq!(repo.member_count(&room_id("xyz")).await, Some(1));
    }

    #[tokio::test]
    async fn test_leave_room_deletes_empty_room() {
        // テスト項目: 最後のメンバーが退出したルームはディレクトリから消える
        // given (前提条件):
        let repo = InMemoryRelayRepository::new(50);
        let alice = register(&repo).await;
        repo.join_room(&alice, room_id("abc"), "Alice")
            .await
            .unwrap();

        // when (操作):
        let departure = repo.leave_room(&alice).await.unwrap();

        // then (期待する結果):
        assert_eq!(departure.user_count, 0);
        assert_eq!(repo.member_count(&room_id("abc")).await, None);
        assert!(repo.room_summaries().await.is_empty());

        // when (操作): 再 join すると新しいルームとして作られる
        let outcome = repo.join_room(&alice, room_id("abc"), "Alice").await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome.user_count, 1);
    }

    #[tokio::test]
    async fn test_leave_room_not_in_room_is_noop() {
        // テスト項目: 未所属の接続の退出は no-op
        // given (前提条件):
        let repo = InMemoryRelayRepository::new(50);
        let alice = register(&repo).await;

        // when (操作):
        let departure = repo.leave_room(&alice).await;

        // then (期待する結果):
        assert_eq!(departure, None);
    }

    #[tokio::test]
    async fn test_remove_connection_while_in_room() {
        // テスト項目: 在室中の接続を削除するとルームからも消える
        // given (前提条件): Alice と Bob が同じルームに参加済み
        let repo = InMemoryRelayRepository::new(50);
        let alice = register(&repo).await;
        let bob = register(&repo).await;
        repo.join_room(&alice, room_id("abc"), "Alice")
            .await
            .unwrap();
        repo.join_room(&bob, room_id("abc"), "Bob").await.unwrap();

        // when (操作):
        repo.remove_connection(&alice).await;

        // then (期待する結果):
        assert_eq!(repo.member_count(&room_id("abc")).await, Some(1));
        assert_eq!(repo.connection_count().await, 1);
    }

    #[tokio::test]
    async fn test_broadcast_targets_exclude() {
        // テスト項目: exclude を指定すると該当メンバーが対象から外れる
        // given (前提条件):
        let repo = InMemoryRelayRepository::new(50);
        let alice = register(&repo).await;
        let bob = register(&repo).await;
        repo.join_room(&alice, room_id("abc"), "Alice")
            .await
            .unwrap();
        repo.join_room(&bob, room_id("abc"), "Bob").await.unwrap();

        // when (操作):
        let all = repo.broadcast_targets(&room_id("abc"), None).await;
        let without_alice = repo.broadcast_targets(&room_id("abc"), Some(&alice)).await;
        let missing_room = repo.broadcast_targets(&room_id("zzz"), None).await;

        // then (期待する結果):
        assert_eq!(all.len(), 2);
        assert_eq!(without_alice.len(), 1);
        assert_eq!(without_alice[0].0, bob);
        assert!(missing_room.is_empty());
    }

    #[tokio::test]
    async fn test_record_pong_updates_timestamp() {
        // テスト項目: pong の記録で last_pong が更新される
        // given (前提条件):
        let repo = InMemoryRelayRepository::new(50);
        let alice = register(&repo).await;

        // when (操作):
        repo.record_pong(&alice, Timestamp::new(5000)).await;

        // then (期待する結果):
        assert_eq!(repo.last_pong(&alice).await, Some(Timestamp::new(5000)));
    }

    #[tokio::test]
    async fn test_room_summaries() {
        // テスト項目: ルーム一覧に現在のメンバー数が反映される
        // given (前提条件):
        let repo = InMemoryRelayRepository::new(50);
        let alice = register(&repo).await;
        let bob = register(&repo).await;
        repo.join_room(&alice, room_id("abc"), "Alice")
            .await
            .unwrap();
        repo.join_room(&bob, room_id("abc"), "Bob").await.unwrap();

        // when (操作):
        let summaries = repo.room_summaries().await;

        // then (期待する結果):
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, room_id("abc"));
        assert_eq!(summaries[0].user_count, 2);
    }
}
