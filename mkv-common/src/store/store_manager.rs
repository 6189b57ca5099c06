use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};

use crate::config::Settings;
use super::data_types::Kind;
use super::error::StoreResult;
use super::set_ops::{SetAlgebra, SetHandler};
use super::store_core::Store;
use super::traits::*;

/// 线程安全的存储管理器
///
/// 键空间被划分为若干分片，每个分片一把锁；同一个键总是落在同一分片。
/// `shards = 1` 时等价于单一全局锁。
#[derive(Debug, Clone)]
pub struct StoreManager {
    shards: Arc<Vec<Mutex<Store>>>,
}

impl Default for StoreManager {
    fn default() -> Self {
        Self::new()
    }
}

/// 多键操作时按分片序号升序持有的锁
struct ShardGuards<'a> {
    indices: Vec<usize>,
    guards: Vec<MutexGuard<'a, Store>>,
}

impl ShardGuards<'_> {
    fn slot(&self, shard: usize) -> usize {
        self.indices.binary_search(&shard).unwrap_or_else(|pos| pos)
    }
}

impl StoreManager {
    pub const DEFAULT_SHARDS: usize = 16;

    pub fn new() -> Self {
        Self::with_shards(Self::DEFAULT_SHARDS)
    }

    /// 指定分片数量，最少 1 个
    pub fn with_shards(shards: usize) -> Self {
        let shards = (0..shards.max(1)).map(|_| Mutex::new(Store::new())).collect();
        StoreManager {
            shards: Arc::new(shards),
        }
    }

    /// 使用配置构建
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_shards(settings.storage.shards)
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_index(&self, key: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % self.shards.len() as u64) as usize
    }

    fn lock(&self, shard: usize) -> MutexGuard<'_, Store> {
        self.shards[shard]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// 在持有键所在分片锁的情况下执行操作
    fn with_key<R>(&self, key: &str, op: impl FnOnce(&mut Store) -> R) -> R {
        let mut store = self.lock(self.shard_index(key));
        op(&mut store)
    }

    /// 锁住涉及的全部分片，按序号升序加锁避免死锁
    fn lock_keys(&self, keys: &[String]) -> ShardGuards<'_> {
        let mut indices: Vec<usize> = keys.iter().map(|key| self.shard_index(key)).collect();
        indices.sort_unstable();
        indices.dedup();
        let guards = indices.iter().map(|&shard| self.lock(shard)).collect();
        ShardGuards { indices, guards }
    }

    fn algebra(&self, op: SetAlgebra, keys: &[String]) -> StoreResult<HashSet<String>> {
        let mut locked = self.lock_keys(keys);
        let slots: Vec<usize> = keys
            .iter()
            .map(|key| locked.slot(self.shard_index(key)))
            .collect();
        for (key, &slot) in keys.iter().zip(&slots) {
            locked.guards[slot].resolve(key);
        }
        let sets = keys
            .iter()
            .zip(&slots)
            .map(|(key, &slot)| SetHandler::peek(&locked.guards[slot], key))
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(SetHandler::combine(op, sets))
    }

    /// 主动清理所有分片中已到期的键，每个分片最多清理 `batch` 个
    pub fn purge_expired(&self, batch: usize) -> usize {
        (0..self.shards.len())
            .map(|shard| self.lock(shard).purge_expired(batch))
            .sum()
    }

    /// 启动后台过期清理线程
    pub fn start_expiry_sweeper(&self, interval: Duration, batch: usize) -> ExpirySweeper {
        let (shutdown, signal) = mpsc::channel::<()>();
        let store_manager = self.clone();
        let handle = thread::spawn(move || loop {
            match signal.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    let evicted = store_manager.purge_expired(batch);
                    if evicted > 0 {
                        debug!("后台清理了 {} 个过期键", evicted);
                    }
                }
                _ => break,
            }
        });
        info!(
            "过期清理线程已启动: 间隔 {:?}, 每批 {} 个",
            interval, batch
        );
        ExpirySweeper {
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }
}

/// 后台过期清理线程句柄，停止或析构时结束线程
#[derive(Debug)]
pub struct ExpirySweeper {
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ExpirySweeper {
    pub fn stop(mut self) {
        self.shutdown_and_join();
    }

    fn shutdown_and_join(&mut self) {
        // 关闭通道即通知线程退出
        self.shutdown.take();
        if let Some(handle) = self.handle.take() {
            join_logged(handle, "过期清理线程");
        }
    }
}

/// 等待线程结束，线程 panic 时只记录日志，返回线程是否正常退出
fn join_logged(handle: JoinHandle<()>, name: &str) -> bool {
    match handle.join() {
        Ok(()) => true,
        Err(_) => {
            warn!("{}异常退出", name);
            false
        }
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}

// 通用操作
impl StoreManager {
    /// 返回存在的键的数量
    pub fn exists(&self, keys: &[String]) -> usize {
        let mut locked = self.lock_keys(keys);
        keys.iter()
            .filter(|key| {
                let slot = locked.slot(self.shard_index(key));
                locked.guards[slot].exists(key)
            })
            .count()
    }

    pub fn key_type(&self, key: &str) -> Option<Kind> {
        self.with_key(key, |store| store.key_type(key))
    }

    /// 删除多个键，返回实际删除的数量
    pub fn delete(&self, keys: &[String]) -> usize {
        let mut locked = self.lock_keys(keys);
        keys.iter()
            .filter(|key| {
                let slot = locked.slot(self.shard_index(key));
                locked.guards[slot].delete(key)
            })
            .count()
    }

    pub fn expire(&self, key: &str, seconds: i64) -> bool {
        self.with_key(key, |store| store.expire(key, seconds))
    }

    pub fn pexpire(&self, key: &str, millis: i64) -> bool {
        self.with_key(key, |store| store.pexpire(key, millis))
    }

    pub fn expire_at(&self, key: &str, unix_secs: i64) -> bool {
        self.with_key(key, |store| store.expire_at(key, unix_secs))
    }

    pub fn pexpire_at(&self, key: &str, unix_millis: i64) -> bool {
        self.with_key(key, |store| store.pexpire_at(key, unix_millis))
    }

    pub fn ttl(&self, key: &str) -> i64 {
        self.with_key(key, |store| store.ttl(key))
    }

    pub fn pttl(&self, key: &str) -> i64 {
        self.with_key(key, |store| store.pttl(key))
    }

    pub fn persist(&self, key: &str) -> bool {
        self.with_key(key, |store| store.persist(key))
    }

    /// 有效键总数
    pub fn dbsize(&self) -> usize {
        (0..self.shards.len())
            .map(|shard| self.lock(shard).len())
            .sum()
    }

    /// 设置了过期时间的有效键总数
    pub fn expires_count(&self) -> usize {
        (0..self.shards.len())
            .map(|shard| self.lock(shard).expires_len())
            .sum()
    }

    pub fn flush(&self) {
        for shard in 0..self.shards.len() {
            self.lock(shard).flush();
        }
    }
}

// 哈希表操作
impl StoreManager {
    pub fn hset(&self, key: &str, field: String, value: String) -> StoreResult<bool> {
        self.with_key(key, |store| store.hset(key, field, value))
    }

    pub fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        self.with_key(key, |store| store.hget(key, field))
    }

    pub fn hexists(&self, key: &str, field: &str) -> StoreResult<bool> {
        self.with_key(key, |store| store.hexists(key, field))
    }

    pub fn hstrlen(&self, key: &str, field: &str) -> StoreResult<usize> {
        self.with_key(key, |store| store.hstrlen(key, field))
    }

    pub fn hlen(&self, key: &str) -> StoreResult<usize> {
        self.with_key(key, |store| store.hlen(key))
    }

    pub fn hmset(&self, key: &str, pairs: Vec<(String, String)>) -> StoreResult<()> {
        self.with_key(key, |store| store.hmset(key, pairs))
    }

    pub fn hmget(&self, key: &str, fields: &[String]) -> StoreResult<Vec<Option<String>>> {
        self.with_key(key, |store| store.hmget(key, fields))
    }

    pub fn hkeys(&self, key: &str) -> StoreResult<Vec<String>> {
        self.with_key(key, |store| store.hkeys(key))
    }

    pub fn hvals(&self, key: &str) -> StoreResult<Vec<String>> {
        self.with_key(key, |store| store.hvals(key))
    }

    pub fn hgetall(&self, key: &str) -> StoreResult<Vec<(String, String)>> {
        self.with_key(key, |store| store.hgetall(key))
    }

    pub fn hdel(&self, key: &str, fields: &[String]) -> StoreResult<usize> {
        self.with_key(key, |store| store.hdel(key, fields))
    }

    pub fn hincrby(&self, key: &str, field: &str, delta: i64) -> StoreResult<i64> {
        self.with_key(key, |store| store.hincrby(key, field, delta))
    }
}

// 列表操作
impl StoreManager {
    pub fn lpush(&self, key: &str, values: Vec<String>) -> StoreResult<usize> {
        self.with_key(key, |store| store.lpush(key, values))
    }

    pub fn rpush(&self, key: &str, values: Vec<String>) -> StoreResult<usize> {
        self.with_key(key, |store| store.rpush(key, values))
    }

    pub fn lpop(&self, key: &str) -> StoreResult<Option<String>> {
        self.with_key(key, |store| store.lpop(key))
    }

    pub fn rpop(&self, key: &str) -> StoreResult<Option<String>> {
        self.with_key(key, |store| store.rpop(key))
    }

    pub fn llen(&self, key: &str) -> StoreResult<usize> {
        self.with_key(key, |store| store.llen(key))
    }

    pub fn lrange(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<String>> {
        self.with_key(key, |store| store.lrange(key, start, stop))
    }

    pub fn lindex(&self, key: &str, index: isize) -> StoreResult<Option<String>> {
        self.with_key(key, |store| store.lindex(key, index))
    }

    pub fn lset(&self, key: &str, index: isize, value: String) -> StoreResult<()> {
        self.with_key(key, |store| store.lset(key, index, value))
    }
}

// 集合操作
impl StoreManager {
    pub fn sadd(&self, key: &str, members: Vec<String>) -> StoreResult<usize> {
        self.with_key(key, |store| store.sadd(key, members))
    }

    pub fn srem(&self, key: &str, members: &[String]) -> StoreResult<usize> {
        self.with_key(key, |store| store.srem(key, members))
    }

    pub fn scard(&self, key: &str) -> StoreResult<usize> {
        self.with_key(key, |store| store.scard(key))
    }

    pub fn sismember(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.with_key(key, |store| store.sismember(key, member))
    }

    pub fn smembers(&self, key: &str) -> StoreResult<HashSet<String>> {
        self.with_key(key, |store| store.smembers(key))
    }

    pub fn sdiff(&self, keys: &[String]) -> StoreResult<HashSet<String>> {
        self.algebra(SetAlgebra::Diff, keys)
    }

    pub fn sunion(&self, keys: &[String]) -> StoreResult<HashSet<String>> {
        self.algebra(SetAlgebra::Union, keys)
    }

    pub fn sinter(&self, keys: &[String]) -> StoreResult<HashSet<String>> {
        self.algebra(SetAlgebra::Inter, keys)
    }
}

// 有序集合操作
impl StoreManager {
    pub fn zadd(&self, key: &str, entries: Vec<(f64, String)>) -> StoreResult<usize> {
        self.with_key(key, |store| store.zadd(key, entries))
    }

    pub fn zrem(&self, key: &str, members: &[String]) -> StoreResult<usize> {
        self.with_key(key, |store| store.zrem(key, members))
    }

    pub fn zcard(&self, key: &str) -> StoreResult<usize> {
        self.with_key(key, |store| store.zcard(key))
    }

    pub fn zscore(&self, key: &str, member: &str) -> StoreResult<Option<f64>> {
        self.with_key(key, |store| store.zscore(key, member))
    }

    pub fn zrange(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<(String, f64)>> {
        self.with_key(key, |store| store.zrange(key, start, stop))
    }

    pub fn zrevrange(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> StoreResult<Vec<(String, f64)>> {
        self.with_key(key, |store| store.zrevrange(key, start, stop))
    }

    pub fn zrank(&self, key: &str, member: &str) -> StoreResult<Option<usize>> {
        self.with_key(key, |store| store.zrank(key, member))
    }

    pub fn zrevrank(&self, key: &str, member: &str) -> StoreResult<Option<usize>> {
        self.with_key(key, |store| store.zrevrank(key, member))
    }

    pub fn zincrby(&self, key: &str, delta: f64, member: &str) -> StoreResult<f64> {
        self.with_key(key, |store| store.zincrby(key, delta, member))
    }
}
