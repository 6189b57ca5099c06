use thiserror::Error;

use super::data_types::Kind;

/// 存储操作错误类型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// 对已存在的键执行了其他类型的操作
    #[error("WRONGTYPE 键 '{key}' 类型不匹配: 期望 {expected}, 实际 {found}")]
    TypeMismatch {
        key: String,
        expected: Kind,
        found: Kind,
    },
    /// 列表位置写入越界
    #[error("索引 {index} 超出范围 (长度 {len})")]
    IndexOutOfRange { index: isize, len: usize },
    /// 参数不合法
    #[error("参数无效: {0}")]
    InvalidArgument(String),
}

impl StoreError {
    pub(crate) fn mismatch(key: &str, expected: Kind, found: Kind) -> Self {
        StoreError::TypeMismatch {
            key: key.to_string(),
            expected,
            found,
        }
    }
}

/// 存储操作结果类型
pub type StoreResult<T> = Result<T, StoreError>;
