use std::collections::HashSet;

use super::data_types::Kind;
use super::error::StoreResult;
use super::expiry::now_ms;

/// 键空间的通用操作
///
/// 所有方法都先做惰性过期检查，所以读操作同样需要 `&mut self`。
pub trait KeyOperations {
    /// 检查键是否存在
    fn exists(&mut self, key: &str) -> bool;

    /// 获取键的数据类型
    fn key_type(&mut self, key: &str) -> Option<Kind>;

    /// 删除键，返回键删除前是否存在
    fn delete(&mut self, key: &str) -> bool;

    /// 设置绝对过期时间（毫秒），键不存在时返回 false
    ///
    /// 时间点已过去时立即删除键，仍然返回 true。
    fn set_expire_at(&mut self, key: &str, at_ms: i64) -> bool;

    /// 剩余生存时间（毫秒）：-2 键不存在，-1 未设置过期
    fn pttl(&mut self, key: &str) -> i64;

    /// 移除键的过期时间
    fn persist(&mut self, key: &str) -> bool;

    /// 相对过期时间（秒）
    fn expire(&mut self, key: &str, seconds: i64) -> bool {
        self.set_expire_at(key, now_ms().saturating_add(seconds.saturating_mul(1000)))
    }

    /// 相对过期时间（毫秒）
    fn pexpire(&mut self, key: &str, millis: i64) -> bool {
        self.set_expire_at(key, now_ms().saturating_add(millis))
    }

    /// 绝对过期时间（秒级 Unix 时间戳）
    fn expire_at(&mut self, key: &str, unix_secs: i64) -> bool {
        self.set_expire_at(key, unix_secs.saturating_mul(1000))
    }

    /// 绝对过期时间（毫秒级 Unix 时间戳）
    fn pexpire_at(&mut self, key: &str, unix_millis: i64) -> bool {
        self.set_expire_at(key, unix_millis)
    }

    /// 剩余生存时间（秒，向上取整）
    fn ttl(&mut self, key: &str) -> i64 {
        match self.pttl(key) {
            ms if ms < 0 => ms,
            ms => (ms + 999) / 1000,
        }
    }
}

/// 哈希表操作 trait
pub trait HashOperations {
    /// 设置哈希字段，字段为新建时返回 true
    fn hset(&mut self, key: &str, field: String, value: String) -> StoreResult<bool>;

    fn hget(&mut self, key: &str, field: &str) -> StoreResult<Option<String>>;

    fn hexists(&mut self, key: &str, field: &str) -> StoreResult<bool>;

    /// 字段值的字节长度，字段不存在时为 0
    fn hstrlen(&mut self, key: &str, field: &str) -> StoreResult<usize>;

    fn hlen(&mut self, key: &str) -> StoreResult<usize>;

    /// 批量设置哈希字段
    fn hmset(&mut self, key: &str, pairs: Vec<(String, String)>) -> StoreResult<()>;

    /// 批量获取，结果顺序与请求字段一致
    fn hmget(&mut self, key: &str, fields: &[String]) -> StoreResult<Vec<Option<String>>>;

    fn hkeys(&mut self, key: &str) -> StoreResult<Vec<String>>;

    fn hvals(&mut self, key: &str) -> StoreResult<Vec<String>>;

    fn hgetall(&mut self, key: &str) -> StoreResult<Vec<(String, String)>>;

    /// 删除字段，返回实际删除的数量
    fn hdel(&mut self, key: &str, fields: &[String]) -> StoreResult<usize>;

    /// 字段整数值加上 delta，返回新值
    fn hincrby(&mut self, key: &str, field: &str, delta: i64) -> StoreResult<i64>;
}

/// 列表操作 trait
pub trait ListOperations {
    /// 依次从左侧推入元素，返回新长度
    fn lpush(&mut self, key: &str, values: Vec<String>) -> StoreResult<usize>;

    /// 依次从右侧推入元素，返回新长度
    fn rpush(&mut self, key: &str, values: Vec<String>) -> StoreResult<usize>;

    fn lpop(&mut self, key: &str) -> StoreResult<Option<String>>;

    fn rpop(&mut self, key: &str) -> StoreResult<Option<String>>;

    fn llen(&mut self, key: &str) -> StoreResult<usize>;

    /// 闭区间范围查询，支持负索引
    fn lrange(&mut self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<String>>;

    fn lindex(&mut self, key: &str, index: isize) -> StoreResult<Option<String>>;

    /// 根据索引设置元素
    fn lset(&mut self, key: &str, index: isize, value: String) -> StoreResult<()>;
}

/// 集合操作 trait
pub trait SetOperations {
    /// 添加成员，返回新加入的数量
    fn sadd(&mut self, key: &str, members: Vec<String>) -> StoreResult<usize>;

    /// 移除成员，返回实际移除的数量
    fn srem(&mut self, key: &str, members: &[String]) -> StoreResult<usize>;

    fn scard(&mut self, key: &str) -> StoreResult<usize>;

    fn sismember(&mut self, key: &str, member: &str) -> StoreResult<bool>;

    fn smembers(&mut self, key: &str) -> StoreResult<HashSet<String>>;

    /// 第一个集合减去其余集合
    fn sdiff(&mut self, keys: &[String]) -> StoreResult<HashSet<String>>;

    fn sunion(&mut self, keys: &[String]) -> StoreResult<HashSet<String>>;

    fn sinter(&mut self, keys: &[String]) -> StoreResult<HashSet<String>>;
}

/// 有序集合操作 trait
pub trait SortedSetOperations {
    /// 添加或更新成员分数，返回新加入的成员数量
    fn zadd(&mut self, key: &str, entries: Vec<(f64, String)>) -> StoreResult<usize>;

    fn zrem(&mut self, key: &str, members: &[String]) -> StoreResult<usize>;

    fn zcard(&mut self, key: &str) -> StoreResult<usize>;

    fn zscore(&mut self, key: &str, member: &str) -> StoreResult<Option<f64>>;

    /// 按排名升序取闭区间 [start, stop]
    fn zrange(&mut self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<(String, f64)>>;

    /// 按排名降序取闭区间 [start, stop]
    fn zrevrange(&mut self, key: &str, start: isize, stop: isize)
        -> StoreResult<Vec<(String, f64)>>;

    fn zrank(&mut self, key: &str, member: &str) -> StoreResult<Option<usize>>;

    fn zrevrank(&mut self, key: &str, member: &str) -> StoreResult<Option<usize>>;

    /// 成员分数加上 delta，返回新分数
    fn zincrby(&mut self, key: &str, delta: f64, member: &str) -> StoreResult<f64>;
}
