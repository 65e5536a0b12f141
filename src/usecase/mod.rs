//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod connect;
pub mod disconnect;
pub mod error;
pub mod heartbeat;
pub mod join_room;
pub mod leave_room;
pub mod relay_audio;
pub mod send_message;

pub use connect::RegisterConnectionUseCase;
pub use disconnect::DisconnectUseCase;
pub use error::JoinError;
pub use heartbeat::{HeartbeatUseCase, Liveness};
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use relay_audio::{AudioBroadcast, RelayAudioUseCase};
pub use send_message::{MessageBroadcast, SendMessageUseCase};
