use super::data_types::{DataType, HashValue, Kind};
use super::error::{StoreError, StoreResult};
use super::store_core::Store;

pub struct HashHandler;

impl HashHandler {
    /// 只读访问已存在的哈希表
    fn existing<'a>(store: &'a mut Store, key: &str) -> StoreResult<Option<&'a HashValue>> {
        match store.get(key) {
            Some(DataType::Hash(hash)) => Ok(Some(hash)),
            Some(other) => Err(StoreError::mismatch(key, Kind::Hash, other.kind())),
            None => Ok(None),
        }
    }

    /// 获取哈希表，不存在时创建
    fn writable<'a>(store: &'a mut Store, key: &str) -> StoreResult<&'a mut HashValue> {
        match store.get_or_create(key, Kind::Hash)? {
            DataType::Hash(hash) => Ok(hash),
            other => Err(StoreError::mismatch(key, Kind::Hash, other.kind())),
        }
    }

    /// 设置哈希字段的内部实现
    pub fn hset_internal(
        store: &mut Store,
        key: &str,
        field: String,
        value: String,
    ) -> StoreResult<bool> {
        Ok(Self::writable(store, key)?.insert(field, value))
    }

    /// 获取哈希字段值的内部实现
    pub fn hget_internal(store: &mut Store, key: &str, field: &str) -> StoreResult<Option<String>> {
        Ok(Self::existing(store, key)?.and_then(|hash| hash.get(field).cloned()))
    }

    pub fn hexists_internal(store: &mut Store, key: &str, field: &str) -> StoreResult<bool> {
        Ok(Self::existing(store, key)?.map_or(false, |hash| hash.contains(field)))
    }

    pub fn hstrlen_internal(store: &mut Store, key: &str, field: &str) -> StoreResult<usize> {
        Ok(Self::existing(store, key)?
            .and_then(|hash| hash.get(field))
            .map_or(0, |value| value.len()))
    }

    pub fn hlen_internal(store: &mut Store, key: &str) -> StoreResult<usize> {
        Ok(Self::existing(store, key)?.map_or(0, HashValue::len))
    }

    /// 批量设置哈希字段的内部实现
    ///
    /// 整个过程持有同一把锁，观察者看不到部分写入的结果。
    pub fn hmset_internal(
        store: &mut Store,
        key: &str,
        pairs: Vec<(String, String)>,
    ) -> StoreResult<()> {
        if pairs.is_empty() {
            return Ok(());
        }
        let hash = Self::writable(store, key)?;
        for (field, value) in pairs {
            hash.insert(field, value);
        }
        Ok(())
    }

    /// 批量获取哈希字段值的内部实现
    pub fn hmget_internal(
        store: &mut Store,
        key: &str,
        fields: &[String],
    ) -> StoreResult<Vec<Option<String>>> {
        match Self::existing(store, key)? {
            Some(hash) => Ok(fields.iter().map(|field| hash.get(field).cloned()).collect()),
            None => Ok(vec![None; fields.len()]),
        }
    }

    pub fn hkeys_internal(store: &mut Store, key: &str) -> StoreResult<Vec<String>> {
        Ok(Self::existing(store, key)?
            .map(|hash| hash.iter().map(|(field, _)| field.clone()).collect())
            .unwrap_or_default())
    }

    pub fn hvals_internal(store: &mut Store, key: &str) -> StoreResult<Vec<String>> {
        Ok(Self::existing(store, key)?
            .map(|hash| hash.iter().map(|(_, value)| value.clone()).collect())
            .unwrap_or_default())
    }

    pub fn hgetall_internal(store: &mut Store, key: &str) -> StoreResult<Vec<(String, String)>> {
        Ok(Self::existing(store, key)?
            .map(|hash| {
                hash.iter()
                    .map(|(field, value)| (field.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    /// 删除哈希字段，最后一个字段删除后键随之消失
    pub fn hdel_internal(store: &mut Store, key: &str, fields: &[String]) -> StoreResult<usize> {
        let removed = match store.get_mut(key) {
            Some(DataType::Hash(hash)) => fields.iter().filter(|field| hash.remove(field)).count(),
            Some(other) => return Err(StoreError::mismatch(key, Kind::Hash, other.kind())),
            None => 0,
        };
        store.remove_if_empty(key);
        Ok(removed)
    }

    /// 字段不存在时按 0 处理
    pub fn hincrby_internal(
        store: &mut Store,
        key: &str,
        field: &str,
        delta: i64,
    ) -> StoreResult<i64> {
        let current = match Self::existing(store, key)?.and_then(|hash| hash.get(field)) {
            Some(value) => value.parse::<i64>().map_err(|_| {
                StoreError::InvalidArgument(format!("哈希字段 '{}' 的值不是整数", field))
            })?,
            None => 0,
        };
        let updated = current
            .checked_add(delta)
            .ok_or_else(|| StoreError::InvalidArgument("整数加法溢出".to_string()))?;
        Self::writable(store, key)?.insert(field.to_string(), updated.to_string());
        Ok(updated)
    }
}
