//! Infrastructure 層
//!
//! DTO（ワイヤフォーマット）と Repository の具体的な実装を提供します。

pub mod dto;
pub mod repository;
