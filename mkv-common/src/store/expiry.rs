use std::collections::{BTreeSet, HashMap};

use chrono::Utc;

/// 当前 Unix 时间戳（毫秒）
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// 过期时间管理器
///
/// `expire_times` 用于按键查询，`deadlines` 按到期时间排序，
/// 主动清理时只需从头部取出已到期的键。
#[derive(Debug, Clone, Default)]
pub struct ExpiryManager {
    expire_times: HashMap<String, i64>, // 键 -> 绝对过期时间（毫秒）
    deadlines: BTreeSet<(i64, String)>,
}

impl ExpiryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置键的绝对过期时间（毫秒）
    pub fn set_expire_at(&mut self, key: &str, at_ms: i64) {
        if let Some(old) = self.expire_times.insert(key.to_string(), at_ms) {
            self.deadlines.remove(&(old, key.to_string()));
        }
        self.deadlines.insert((at_ms, key.to_string()));
    }

    /// 检查键在 `now` 时刻是否已过期
    pub fn is_expired(&self, key: &str, now: i64) -> bool {
        match self.expire_times.get(key) {
            Some(at) => now >= *at,
            None => false,
        }
    }

    /// 剩余毫秒数，未设置过期时间返回 None
    pub fn remaining_ms(&self, key: &str, now: i64) -> Option<i64> {
        self.expire_times.get(key).map(|at| (*at - now).max(0))
    }

    /// 移除键的过期时间
    pub fn persist(&mut self, key: &str) -> bool {
        match self.expire_times.remove(key) {
            Some(at) => {
                self.deadlines.remove(&(at, key.to_string()));
                true
            }
            None => false,
        }
    }

    /// 删除键时一并清除过期设置
    pub fn remove_key(&mut self, key: &str) {
        self.persist(key);
    }

    /// 取出最多 `limit` 个已到期的键，最早到期的优先
    pub fn pop_expired(&mut self, now: i64, limit: usize) -> Vec<String> {
        let mut expired = Vec::new();
        while expired.len() < limit {
            let due = match self.deadlines.first() {
                Some((at, _)) => *at <= now,
                None => false,
            };
            if !due {
                break;
            }
            if let Some((_, key)) = self.deadlines.pop_first() {
                self.expire_times.remove(&key);
                expired.push(key);
            }
        }
        expired
    }

    /// 设置了过期时间的键数量
    pub fn len(&self) -> usize {
        self.expire_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expire_times.is_empty()
    }

    /// 清空所有过期时间设置
    pub fn clear(&mut self) {
        self.expire_times.clear();
        self.deadlines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_expired_in_deadline_order() {
        let mut expiry = ExpiryManager::new();
        expiry.set_expire_at("late", 300);
        expiry.set_expire_at("early", 100);
        expiry.set_expire_at("future", 10_000);

        assert_eq!(expiry.pop_expired(500, 1), vec!["early".to_string()]);
        assert_eq!(expiry.pop_expired(500, 10), vec!["late".to_string()]);
        assert!(expiry.pop_expired(500, 10).is_empty());
        assert_eq!(expiry.len(), 1);
    }

    #[test]
    fn test_reset_deadline_replaces_old_one() {
        let mut expiry = ExpiryManager::new();
        expiry.set_expire_at("k", 100);
        expiry.set_expire_at("k", 1_000);

        assert!(expiry.pop_expired(500, 10).is_empty());
        assert!(!expiry.is_expired("k", 999));
        assert!(expiry.is_expired("k", 1_000));
        assert_eq!(expiry.remaining_ms("k", 400), Some(600));
    }

    #[test]
    fn test_persist() {
        let mut expiry = ExpiryManager::new();
        expiry.set_expire_at("k", 100);
        assert!(expiry.persist("k"));
        assert!(!expiry.persist("k"));
        assert_eq!(expiry.remaining_ms("k", 0), None);
        assert!(expiry.pop_expired(i64::MAX, 10).is_empty());
    }
}
