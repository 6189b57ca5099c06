use std::collections::VecDeque;

use super::data_types::{normalize_index, normalize_range, DataType, Kind};
use super::error::{StoreError, StoreResult};
use super::store_core::Store;

pub struct ListHandler;

/// 推入方向
#[derive(Debug, Clone, Copy)]
enum End {
    Head,
    Tail,
}

impl ListHandler {
    fn existing<'a>(store: &'a mut Store, key: &str) -> StoreResult<Option<&'a VecDeque<String>>> {
        match store.get(key) {
            Some(DataType::List(list)) => Ok(Some(list)),
            Some(other) => Err(StoreError::mismatch(key, Kind::List, other.kind())),
            None => Ok(None),
        }
    }

    fn push(store: &mut Store, key: &str, values: Vec<String>, end: End) -> StoreResult<usize> {
        if values.is_empty() {
            return Self::llen_internal(store, key);
        }
        match store.get_or_create(key, Kind::List)? {
            DataType::List(list) => {
                for value in values {
                    match end {
                        End::Head => list.push_front(value),
                        End::Tail => list.push_back(value),
                    }
                }
                Ok(list.len())
            }
            other => Err(StoreError::mismatch(key, Kind::List, other.kind())),
        }
    }

    fn pop(store: &mut Store, key: &str, end: End) -> StoreResult<Option<String>> {
        let popped = match store.get_mut(key) {
            Some(DataType::List(list)) => match end {
                End::Head => list.pop_front(),
                End::Tail => list.pop_back(),
            },
            Some(other) => return Err(StoreError::mismatch(key, Kind::List, other.kind())),
            None => None,
        };
        store.remove_if_empty(key);
        Ok(popped)
    }

    /// 从左侧推入元素的内部实现，多个值按参数顺序逐个推入
    pub fn lpush_internal(store: &mut Store, key: &str, values: Vec<String>) -> StoreResult<usize> {
        Self::push(store, key, values, End::Head)
    }

    /// 从右侧推入元素的内部实现
    pub fn rpush_internal(store: &mut Store, key: &str, values: Vec<String>) -> StoreResult<usize> {
        Self::push(store, key, values, End::Tail)
    }

    /// 弹出最后一个元素后删除键
    pub fn lpop_internal(store: &mut Store, key: &str) -> StoreResult<Option<String>> {
        Self::pop(store, key, End::Head)
    }

    pub fn rpop_internal(store: &mut Store, key: &str) -> StoreResult<Option<String>> {
        Self::pop(store, key, End::Tail)
    }

    pub fn llen_internal(store: &mut Store, key: &str) -> StoreResult<usize> {
        Ok(Self::existing(store, key)?.map_or(0, VecDeque::len))
    }

    /// 获取列表范围内元素的内部实现
    pub fn lrange_internal(
        store: &mut Store,
        key: &str,
        start: isize,
        stop: isize,
    ) -> StoreResult<Vec<String>> {
        let list = match Self::existing(store, key)? {
            Some(list) => list,
            None => return Ok(vec![]),
        };
        match normalize_range(start, stop, list.len()) {
            Some((lo, hi)) => Ok(list.range(lo..=hi).cloned().collect()),
            None => Ok(vec![]),
        }
    }

    pub fn lindex_internal(store: &mut Store, key: &str, index: isize) -> StoreResult<Option<String>> {
        Ok(Self::existing(store, key)?.and_then(|list| {
            normalize_index(index, list.len()).and_then(|idx| list.get(idx).cloned())
        }))
    }

    /// 根据索引设置元素，键不存在视为长度为 0
    pub fn lset_internal(
        store: &mut Store,
        key: &str,
        index: isize,
        value: String,
    ) -> StoreResult<()> {
        match store.get_mut(key) {
            Some(DataType::List(list)) => {
                let len = list.len();
                match normalize_index(index, len).and_then(|idx| list.get_mut(idx)) {
                    Some(slot) => {
                        *slot = value;
                        Ok(())
                    }
                    None => Err(StoreError::IndexOutOfRange { index, len }),
                }
            }
            Some(other) => Err(StoreError::mismatch(key, Kind::List, other.kind())),
            None => Err(StoreError::IndexOutOfRange { index, len: 0 }),
        }
    }
}
