use std::collections::{HashMap, HashSet};

use log::debug;

use super::data_types::{DataType, Kind};
use super::error::{StoreError, StoreResult};
use super::expiry::{now_ms, ExpiryManager};
use super::hash_ops::HashHandler;
use super::list_ops::ListHandler;
use super::set_ops::{SetAlgebra, SetHandler};
use super::traits::*;
use super::zset_ops::SortedSetHandler;

/// 带过期时间的键空间
///
/// 每个访问入口都先经过 [`Store::resolve`]，已过期的键在被发现时删除。
#[derive(Debug, Clone, Default)]
pub struct Store {
    data: HashMap<String, DataType>,
    expiry_manager: ExpiryManager, // 过期时间管理
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// 检查键是否仍然有效，已过期则删除，返回键是否存在
    pub fn resolve(&mut self, key: &str) -> bool {
        if self.expiry_manager.is_expired(key, now_ms()) {
            self.data.remove(key);
            self.expiry_manager.remove_key(key);
            debug!("键 '{}' 已过期，访问时删除", key);
            return false;
        }
        self.data.contains_key(key)
    }

    /// 不做过期检查直接读取
    pub(crate) fn peek(&self, key: &str) -> Option<&DataType> {
        self.data.get(key)
    }

    /// 获取有效的条目
    pub fn get(&mut self, key: &str) -> Option<&DataType> {
        self.resolve(key);
        self.data.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut DataType> {
        self.resolve(key);
        self.data.get_mut(key)
    }

    /// 获取条目，不存在时按 `kind` 创建空值；已存在且类型不同则报错
    pub fn get_or_create(&mut self, key: &str, kind: Kind) -> StoreResult<&mut DataType> {
        self.resolve(key);
        let entry = self
            .data
            .entry(key.to_string())
            .or_insert_with(|| DataType::empty(kind));
        if entry.kind() != kind {
            return Err(StoreError::mismatch(key, kind, entry.kind()));
        }
        Ok(entry)
    }

    /// 集合类值为空时移除键及其过期时间
    pub fn remove_if_empty(&mut self, key: &str) {
        if self.data.get(key).map_or(false, DataType::is_empty) {
            self.remove(key);
        }
    }

    fn remove(&mut self, key: &str) -> bool {
        self.expiry_manager.remove_key(key);
        self.data.remove(key).is_some()
    }

    /// 主动清理：最多删除 `limit` 个已到期的键
    pub fn purge_expired(&mut self, limit: usize) -> usize {
        let expired = self.expiry_manager.pop_expired(now_ms(), limit);
        for key in &expired {
            self.data.remove(key);
        }
        expired.len()
    }

    /// 有效键数量
    pub fn len(&mut self) -> usize {
        self.purge_expired(usize::MAX);
        self.data.len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// 设置了过期时间且仍然有效的键数量
    pub fn expires_len(&mut self) -> usize {
        self.purge_expired(usize::MAX);
        self.expiry_manager.len()
    }

    /// 清空所有键
    pub fn flush(&mut self) {
        self.data.clear();
        self.expiry_manager.clear();
    }
}

impl KeyOperations for Store {
    fn exists(&mut self, key: &str) -> bool {
        self.resolve(key)
    }

    fn key_type(&mut self, key: &str) -> Option<Kind> {
        self.get(key).map(DataType::kind)
    }

    fn delete(&mut self, key: &str) -> bool {
        self.resolve(key) && self.remove(key)
    }

    fn set_expire_at(&mut self, key: &str, at_ms: i64) -> bool {
        if !self.resolve(key) {
            return false;
        }
        if at_ms <= now_ms() {
            self.remove(key);
        } else {
            self.expiry_manager.set_expire_at(key, at_ms);
        }
        true
    }

    fn pttl(&mut self, key: &str) -> i64 {
        if !self.resolve(key) {
            return -2;
        }
        self.expiry_manager.remaining_ms(key, now_ms()).unwrap_or(-1)
    }

    fn persist(&mut self, key: &str) -> bool {
        self.resolve(key) && self.expiry_manager.persist(key)
    }
}

impl HashOperations for Store {
    fn hset(&mut self, key: &str, field: String, value: String) -> StoreResult<bool> {
        HashHandler::hset_internal(self, key, field, value)
    }

    fn hget(&mut self, key: &str, field: &str) -> StoreResult<Option<String>> {
        HashHandler::hget_internal(self, key, field)
    }

    fn hexists(&mut self, key: &str, field: &str) -> StoreResult<bool> {
        HashHandler::hexists_internal(self, key, field)
    }

    fn hstrlen(&mut self, key: &str, field: &str) -> StoreResult<usize> {
        HashHandler::hstrlen_internal(self, key, field)
    }

    fn hlen(&mut self, key: &str) -> StoreResult<usize> {
        HashHandler::hlen_internal(self, key)
    }

    fn hmset(&mut self, key: &str, pairs: Vec<(String, String)>) -> StoreResult<()> {
        HashHandler::hmset_internal(self, key, pairs)
    }

    fn hmget(&mut self, key: &str, fields: &[String]) -> StoreResult<Vec<Option<String>>> {
        HashHandler::hmget_internal(self, key, fields)
    }

    fn hkeys(&mut self, key: &str) -> StoreResult<Vec<String>> {
        HashHandler::hkeys_internal(self, key)
    }

    fn hvals(&mut self, key: &str) -> StoreResult<Vec<String>> {
        HashHandler::hvals_internal(self, key)
    }

    fn hgetall(&mut self, key: &str) -> StoreResult<Vec<(String, String)>> {
        HashHandler::hgetall_internal(self, key)
    }

    fn hdel(&mut self, key: &str, fields: &[String]) -> StoreResult<usize> {
        HashHandler::hdel_internal(self, key, fields)
    }

    fn hincrby(&mut self, key: &str, field: &str, delta: i64) -> StoreResult<i64> {
        HashHandler::hincrby_internal(self, key, field, delta)
    }
}

impl ListOperations for Store {
    fn lpush(&mut self, key: &str, values: Vec<String>) -> StoreResult<usize> {
        ListHandler::lpush_internal(self, key, values)
    }

    fn rpush(&mut self, key: &str, values: Vec<String>) -> StoreResult<usize> {
        ListHandler::rpush_internal(self, key, values)
    }

    fn lpop(&mut self, key: &str) -> StoreResult<Option<String>> {
        ListHandler::lpop_internal(self, key)
    }

    fn rpop(&mut self, key: &str) -> StoreResult<Option<String>> {
        ListHandler::rpop_internal(self, key)
    }

    fn llen(&mut self, key: &str) -> StoreResult<usize> {
        ListHandler::llen_internal(self, key)
    }

    fn lrange(&mut self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<String>> {
        ListHandler::lrange_internal(self, key, start, stop)
    }

    fn lindex(&mut self, key: &str, index: isize) -> StoreResult<Option<String>> {
        ListHandler::lindex_internal(self, key, index)
    }

    fn lset(&mut self, key: &str, index: isize, value: String) -> StoreResult<()> {
        ListHandler::lset_internal(self, key, index, value)
    }
}

impl SetOperations for Store {
    fn sadd(&mut self, key: &str, members: Vec<String>) -> StoreResult<usize> {
        SetHandler::sadd_internal(self, key, members)
    }

    fn srem(&mut self, key: &str, members: &[String]) -> StoreResult<usize> {
        SetHandler::srem_internal(self, key, members)
    }

    fn scard(&mut self, key: &str) -> StoreResult<usize> {
        SetHandler::scard_internal(self, key)
    }

    fn sismember(&mut self, key: &str, member: &str) -> StoreResult<bool> {
        SetHandler::sismember_internal(self, key, member)
    }

    fn smembers(&mut self, key: &str) -> StoreResult<HashSet<String>> {
        SetHandler::smembers_internal(self, key)
    }

    fn sdiff(&mut self, keys: &[String]) -> StoreResult<HashSet<String>> {
        SetHandler::algebra_internal(self, SetAlgebra::Diff, keys)
    }

    fn sunion(&mut self, keys: &[String]) -> StoreResult<HashSet<String>> {
        SetHandler::algebra_internal(self, SetAlgebra::Union, keys)
    }

    fn sinter(&mut self, keys: &[String]) -> StoreResult<HashSet<String>> {
        SetHandler::algebra_internal(self, SetAlgebra::Inter, keys)
    }
}

impl SortedSetOperations for Store {
    fn zadd(&mut self, key: &str, entries: Vec<(f64, String)>) -> StoreResult<usize> {
        SortedSetHandler::zadd_internal(self, key, entries)
    }

    fn zrem(&mut self, key: &str, members: &[String]) -> StoreResult<usize> {
        SortedSetHandler::zrem_internal(self, key, members)
    }

    fn zcard(&mut self, key: &str) -> StoreResult<usize> {
        SortedSetHandler::zcard_internal(self, key)
    }

    fn zscore(&mut self, key: &str, member: &str) -> StoreResult<Option<f64>> {
        SortedSetHandler::zscore_internal(self, key, member)
    }

    fn zrange(&mut self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<(String, f64)>> {
        SortedSetHandler::zrange_internal(self, key, start, stop)
    }

    fn zrevrange(
        &mut self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> StoreResult<Vec<(String, f64)>> {
        SortedSetHandler::zrevrange_internal(self, key, start, stop)
    }

    fn zrank(&mut self, key: &str, member: &str) -> StoreResult<Option<usize>> {
        SortedSetHandler::zrank_internal(self, key, member)
    }

    fn zrevrank(&mut self, key: &str, member: &str) -> StoreResult<Option<usize>> {
        SortedSetHandler::zrevrank_internal(self, key, member)
    }

    fn zincrby(&mut self, key: &str, delta: f64, member: &str) -> StoreResult<f64> {
        SortedSetHandler::zincrby_internal(self, key, delta, member)
    }
}
