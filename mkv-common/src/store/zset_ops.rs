use super::data_types::{normalize_range, DataType, Kind, SortedSetValue};
use super::error::{StoreError, StoreResult};
use super::store_core::Store;

pub struct SortedSetHandler;

impl SortedSetHandler {
    fn existing<'a>(store: &'a mut Store, key: &str) -> StoreResult<Option<&'a SortedSetValue>> {
        match store.get(key) {
            Some(DataType::SortedSet(zset)) => Ok(Some(zset)),
            Some(other) => Err(StoreError::mismatch(key, Kind::SortedSet, other.kind())),
            None => Ok(None),
        }
    }

    fn writable<'a>(store: &'a mut Store, key: &str) -> StoreResult<&'a mut SortedSetValue> {
        match store.get_or_create(key, Kind::SortedSet)? {
            DataType::SortedSet(zset) => Ok(zset),
            other => Err(StoreError::mismatch(key, Kind::SortedSet, other.kind())),
        }
    }

    fn check_score(score: f64) -> StoreResult<()> {
        if score.is_nan() {
            return Err(StoreError::InvalidArgument("分数不能为 NaN".to_string()));
        }
        Ok(())
    }

    /// 添加或更新成员，先校验全部分数再写入
    pub fn zadd_internal(
        store: &mut Store,
        key: &str,
        entries: Vec<(f64, String)>,
    ) -> StoreResult<usize> {
        for (score, _) in &entries {
            Self::check_score(*score)?;
        }
        if entries.is_empty() {
            return Self::zcard_internal(store, key).map(|_| 0);
        }
        let zset = Self::writable(store, key)?;
        Ok(entries
            .into_iter()
            .filter(|(score, member)| zset.insert(member.clone(), *score))
            .count())
    }

    /// 移除成员，最后一个成员移除后删除键
    pub fn zrem_internal(store: &mut Store, key: &str, members: &[String]) -> StoreResult<usize> {
        let removed = match store.get_mut(key) {
            Some(DataType::SortedSet(zset)) => {
                members.iter().filter(|member| zset.remove(member)).count()
            }
            Some(other) => return Err(StoreError::mismatch(key, Kind::SortedSet, other.kind())),
            None => 0,
        };
        store.remove_if_empty(key);
        Ok(removed)
    }

    pub fn zcard_internal(store: &mut Store, key: &str) -> StoreResult<usize> {
        Ok(Self::existing(store, key)?.map_or(0, SortedSetValue::len))
    }

    pub fn zscore_internal(store: &mut Store, key: &str, member: &str) -> StoreResult<Option<f64>> {
        Ok(Self::existing(store, key)?.and_then(|zset| zset.score(member)))
    }

    /// 按升序排名取区间
    pub fn zrange_internal(
        store: &mut Store,
        key: &str,
        start: isize,
        stop: isize,
    ) -> StoreResult<Vec<(String, f64)>> {
        let zset = match Self::existing(store, key)? {
            Some(zset) => zset,
            None => return Ok(vec![]),
        };
        match normalize_range(start, stop, zset.len()) {
            Some((lo, hi)) => Ok(zset.range_by_rank(lo, hi)),
            None => Ok(vec![]),
        }
    }

    /// 按降序排名取区间，排名 0 为最高分
    pub fn zrevrange_internal(
        store: &mut Store,
        key: &str,
        start: isize,
        stop: isize,
    ) -> StoreResult<Vec<(String, f64)>> {
        let zset = match Self::existing(store, key)? {
            Some(zset) => zset,
            None => return Ok(vec![]),
        };
        match normalize_range(start, stop, zset.len()) {
            Some((lo, hi)) => Ok(zset.rev_range_by_rank(lo, hi)),
            None => Ok(vec![]),
        }
    }

    pub fn zrank_internal(store: &mut Store, key: &str, member: &str) -> StoreResult<Option<usize>> {
        Ok(Self::existing(store, key)?.and_then(|zset| zset.rank(member)))
    }

    pub fn zrevrank_internal(
        store: &mut Store,
        key: &str,
        member: &str,
    ) -> StoreResult<Option<usize>> {
        Ok(Self::existing(store, key)?
            .and_then(|zset| zset.rank(member).map(|rank| zset.len() - 1 - rank)))
    }

    /// 成员不存在时从 0 开始累加
    pub fn zincrby_internal(
        store: &mut Store,
        key: &str,
        delta: f64,
        member: &str,
    ) -> StoreResult<f64> {
        Self::check_score(delta)?;
        let current = Self::zscore_internal(store, key, member)?.unwrap_or(0.0);
        let updated = current + delta;
        if updated.is_nan() {
            return Err(StoreError::InvalidArgument(
                "累加结果不是有效数字".to_string(),
            ));
        }
        Self::writable(store, key)?.insert(member.to_string(), updated);
        Ok(updated)
    }
}
