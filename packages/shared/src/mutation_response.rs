//! # 更新系レスポンス
//!
//! 保存・削除が成功したときの `{ "success": true, "message": ... }` 形式。

use serde::{Deserialize, Serialize};

/// 保存・削除成功時のレスポンス
///
/// ```
/// use easyblog_shared::MutationResponse;
///
/// let response = MutationResponse::ok("Note saved");
/// assert!(response.success);
/// assert_eq!(response.message, "Note saved");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
}

impl MutationResponse {
    /// 成功レスポンスを作成する
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
