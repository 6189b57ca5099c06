use std::collections::HashSet;

use super::data_types::{DataType, Kind};
use super::error::{StoreError, StoreResult};
use super::store_core::Store;

/// 多集合运算种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetAlgebra {
    Diff,
    Union,
    Inter,
}

pub struct SetHandler;

impl SetHandler {
    fn existing<'a>(store: &'a mut Store, key: &str) -> StoreResult<Option<&'a HashSet<String>>> {
        store.resolve(key);
        Self::peek(store, key)
    }

    /// 不做过期检查的只读访问，调用方需先对键执行 `Store::resolve`
    pub(crate) fn peek<'a>(store: &'a Store, key: &str) -> StoreResult<Option<&'a HashSet<String>>> {
        match store.peek(key) {
            Some(DataType::Set(set)) => Ok(Some(set)),
            Some(other) => Err(StoreError::mismatch(key, Kind::Set, other.kind())),
            None => Ok(None),
        }
    }

    /// 添加集合成员的内部实现，重复成员不计数
    pub fn sadd_internal(store: &mut Store, key: &str, members: Vec<String>) -> StoreResult<usize> {
        if members.is_empty() {
            return Self::scard_internal(store, key);
        }
        match store.get_or_create(key, Kind::Set)? {
            DataType::Set(set) => Ok(members
                .into_iter()
                .filter(|member| set.insert(member.clone()))
                .count()),
            other => Err(StoreError::mismatch(key, Kind::Set, other.kind())),
        }
    }

    /// 移除集合成员，集合为空时删除键
    pub fn srem_internal(store: &mut Store, key: &str, members: &[String]) -> StoreResult<usize> {
        let removed = match store.get_mut(key) {
            Some(DataType::Set(set)) => members.iter().filter(|member| set.remove(*member)).count(),
            Some(other) => return Err(StoreError::mismatch(key, Kind::Set, other.kind())),
            None => 0,
        };
        store.remove_if_empty(key);
        Ok(removed)
    }

    pub fn scard_internal(store: &mut Store, key: &str) -> StoreResult<usize> {
        Ok(Self::existing(store, key)?.map_or(0, HashSet::len))
    }

    pub fn sismember_internal(store: &mut Store, key: &str, member: &str) -> StoreResult<bool> {
        Ok(Self::existing(store, key)?.map_or(false, |set| set.contains(member)))
    }

    pub fn smembers_internal(store: &mut Store, key: &str) -> StoreResult<HashSet<String>> {
        Ok(Self::existing(store, key)?.cloned().unwrap_or_default())
    }

    /// 单个分片内的集合运算
    pub fn algebra_internal(
        store: &mut Store,
        op: SetAlgebra,
        keys: &[String],
    ) -> StoreResult<HashSet<String>> {
        for key in keys {
            store.resolve(key);
        }
        let store: &Store = store;
        let sets = keys
            .iter()
            .map(|key| Self::peek(store, key))
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Self::combine(op, sets))
    }

    /// 从左到右折叠，缺失的键视为空集合
    pub fn combine<'a, I>(op: SetAlgebra, sets: I) -> HashSet<String>
    where
        I: IntoIterator<Item = Option<&'a HashSet<String>>>,
    {
        let mut sets = sets.into_iter();
        let mut acc = match sets.next() {
            Some(Some(first)) => first.clone(),
            _ => HashSet::new(),
        };
        for set in sets {
            match (op, set) {
                (SetAlgebra::Diff, Some(set)) => acc.retain(|member| !set.contains(member)),
                (SetAlgebra::Union, Some(set)) => acc.extend(set.iter().cloned()),
                (SetAlgebra::Inter, Some(set)) => acc.retain(|member| set.contains(member)),
                (SetAlgebra::Inter, None) => acc.clear(),
                (_, None) => {}
            }
        }
        acc
    }
}
