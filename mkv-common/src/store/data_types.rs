use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;

use super::rank_index::RankIndex;

/// 值类型标签，键创建后不会改变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Hash,
    List,
    Set,
    SortedSet,
}

impl Kind {
    /// 对外展示的类型名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Hash => "hash",
            Kind::List => "list",
            Kind::Set => "set",
            Kind::SortedSet => "zset",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 存储系统中支持的数据类型
#[derive(Debug, Clone)]
pub enum DataType {
    /// 哈希表类型（保持字段首次插入顺序）
    Hash(HashValue),
    /// 列表类型（双向队列实现）
    List(VecDeque<String>),
    /// 集合类型
    Set(HashSet<String>),
    /// 有序集合类型
    SortedSet(SortedSetValue),
}

impl DataType {
    /// 创建指定类型的空值
    pub fn empty(kind: Kind) -> Self {
        match kind {
            Kind::Hash => DataType::Hash(HashValue::default()),
            Kind::List => DataType::List(VecDeque::new()),
            Kind::Set => DataType::Set(HashSet::new()),
            Kind::SortedSet => DataType::SortedSet(SortedSetValue::default()),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            DataType::Hash(_) => Kind::Hash,
            DataType::List(_) => Kind::List,
            DataType::Set(_) => Kind::Set,
            DataType::SortedSet(_) => Kind::SortedSet,
        }
    }

    /// 集合内容为空时键应当被移除
    pub fn is_empty(&self) -> bool {
        match self {
            DataType::Hash(hash) => hash.is_empty(),
            DataType::List(list) => list.is_empty(),
            DataType::Set(set) => set.is_empty(),
            DataType::SortedSet(zset) => zset.is_empty(),
        }
    }
}

/// 按字段首次插入顺序迭代的哈希表
///
/// 覆盖已有字段保留原位置，删除后重新写入的字段排到末尾。
#[derive(Debug, Clone, Default)]
pub struct HashValue {
    fields: HashMap<String, (u64, String)>,
    order: BTreeMap<u64, String>,
    next_seq: u64,
}

impl HashValue {
    /// 写入字段，返回字段是否为新建
    pub fn insert(&mut self, field: String, value: String) -> bool {
        if let Some((_, current)) = self.fields.get_mut(&field) {
            *current = value;
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, field.clone());
        self.fields.insert(field, (seq, value));
        true
    }

    pub fn get(&self, field: &str) -> Option<&String> {
        self.fields.get(field).map(|(_, value)| value)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn remove(&mut self, field: &str) -> bool {
        match self.fields.remove(field) {
            Some((seq, _)) => {
                self.order.remove(&seq);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 按插入顺序迭代 (字段, 值)
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> + '_ {
        self.order
            .values()
            .filter_map(move |field| self.fields.get(field).map(|(_, value)| (field, value)))
    }
}

/// 有序集合：成员到分数的映射 + 按 (分数, 成员) 排序的跳表索引
///
/// 两个结构只能通过本类型的方法修改，始终包含相同的成员。
#[derive(Debug, Clone, Default)]
pub struct SortedSetValue {
    scores: HashMap<String, f64>,
    index: RankIndex,
}

impl SortedSetValue {
    /// 插入或更新成员分数，返回成员是否为新加入
    pub fn insert(&mut self, member: String, score: f64) -> bool {
        match self.scores.insert(member.clone(), score) {
            Some(old) if old.to_bits() == score.to_bits() => false,
            Some(old) => {
                self.index.remove(old, &member);
                self.index.insert(score, member);
                false
            }
            None => {
                self.index.insert(score, member);
                true
            }
        }
    }

    pub fn remove(&mut self, member: &str) -> bool {
        match self.scores.remove(member) {
            Some(score) => self.index.remove(score, member),
            None => false,
        }
    }

    pub fn score(&self, member: &str) -> Option<f64> {
        self.scores.get(member).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// 升序排名（从 0 开始）
    pub fn rank(&self, member: &str) -> Option<usize> {
        let score = self.scores.get(member)?;
        self.index.rank(*score, member)
    }

    /// 升序排名区间 [lo, hi]，越界或区间为空时返回空
    pub fn range_by_rank(&self, lo: usize, hi: usize) -> Vec<(String, f64)> {
        self.index.range(lo, hi)
    }

    /// 降序排名区间 [lo, hi]，结果按分数从高到低
    pub fn rev_range_by_rank(&self, lo: usize, hi: usize) -> Vec<(String, f64)> {
        self.index.rev_range(lo, hi)
    }

    /// 按 (分数, 成员) 升序迭代
    pub fn iter(&self) -> impl Iterator<Item = (&String, f64)> + '_ {
        self.index.iter()
    }
}

/// 将可能为负的闭区间规范化为 [start, stop] 下标，区间为空时返回 None
pub fn normalize_range(start: isize, stop: isize, len: usize) -> Option<(usize, usize)> {
    let len = len as isize;
    if len == 0 {
        return None;
    }
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if stop < 0 || start >= len || start > stop {
        return None;
    }
    Some((start as usize, stop as usize))
}

/// 规范化单个下标，负数从尾部计数
pub fn normalize_index(index: isize, len: usize) -> Option<usize> {
    let len = len as isize;
    let index = if index < 0 { len + index } else { index };
    if (0..len).contains(&index) {
        Some(index as usize)
    } else {
        None
    }
}
