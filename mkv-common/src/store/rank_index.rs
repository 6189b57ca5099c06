use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use rand::Rng;

const MAX_LEVEL: usize = 32;
const LEVEL_P: f64 = 0.25;
/// 头节点固定占用 0 号槽位
const HEAD: usize = 0;

#[derive(Debug, Clone, Copy, Default)]
struct Link {
    next: Option<usize>,
    // 到 next 之间跨过的节点数，next 为空时为到末尾的节点数
    span: usize,
}

#[derive(Debug, Clone)]
struct Node {
    member: String,
    score: f64,
    links: Vec<Link>,
    backward: Option<usize>,
}

fn compare(score_a: f64, member_a: &str, score_b: f64, member_b: &str) -> Ordering {
    OrderedFloat(score_a)
        .cmp(&OrderedFloat(score_b))
        .then_with(|| member_a.cmp(member_b))
}

/// 按 (分数, 成员) 排序的跳表，每层链接记录跨度，可按排名 O(log n) 定位
///
/// 节点存放在 `nodes` 中，用下标代替指针；删除的槽位进入空闲列表复用。
#[derive(Debug, Clone)]
pub(crate) struct RankIndex {
    nodes: Vec<Node>,
    free: Vec<usize>,
    tail: Option<usize>,
    level: usize,
    len: usize,
}

impl Default for RankIndex {
    fn default() -> Self {
        let head = Node {
            member: String::new(),
            score: 0.0,
            links: vec![Link::default(); MAX_LEVEL],
            backward: None,
        };
        RankIndex {
            nodes: vec![head],
            free: Vec::new(),
            tail: None,
            level: 1,
            len: 0,
        }
    }
}

impl RankIndex {
    fn link(&self, idx: usize, level: usize) -> Link {
        self.nodes[idx].links[level]
    }

    fn order(&self, idx: usize, score: f64, member: &str) -> Ordering {
        let node = &self.nodes[idx];
        compare(node.score, &node.member, score, member)
    }

    fn random_level() -> usize {
        let mut rng = rand::rng();
        let mut level = 1;
        while level < MAX_LEVEL && rng.random_bool(LEVEL_P) {
            level += 1;
        }
        level
    }

    fn alloc(&mut self, node: Node) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// 每层最后一个小于 (score, member) 的节点，以及它的排名
    fn predecessors(&self, score: f64, member: &str) -> ([usize; MAX_LEVEL], [usize; MAX_LEVEL]) {
        let mut update = [HEAD; MAX_LEVEL];
        let mut rank = [0usize; MAX_LEVEL];
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            rank[i] = if i + 1 == self.level { 0 } else { rank[i + 1] };
            while let Some(next) = self.link(x, i).next {
                if self.order(next, score, member) != Ordering::Less {
                    break;
                }
                rank[i] += self.link(x, i).span;
                x = next;
            }
            update[i] = x;
        }
        (update, rank)
    }

    /// 插入新节点，调用方保证 (score, member) 尚不存在
    pub fn insert(&mut self, score: f64, member: String) {
        let (mut update, mut rank) = self.predecessors(score, &member);
        let level = Self::random_level();
        if level > self.level {
            for i in self.level..level {
                rank[i] = 0;
                update[i] = HEAD;
                self.nodes[HEAD].links[i].span = self.len;
            }
            self.level = level;
        }

        let backward = if update[0] == HEAD { None } else { Some(update[0]) };
        let idx = self.alloc(Node {
            member,
            score,
            links: vec![Link::default(); level],
            backward,
        });
        for i in 0..level {
            let prev = update[i];
            let before = self.link(prev, i);
            self.nodes[idx].links[i] = Link {
                next: before.next,
                span: before.span - (rank[0] - rank[i]),
            };
            self.nodes[prev].links[i] = Link {
                next: Some(idx),
                span: rank[0] - rank[i] + 1,
            };
        }
        for i in level..self.level {
            self.nodes[update[i]].links[i].span += 1;
        }

        match self.link(idx, 0).next {
            Some(next) => self.nodes[next].backward = Some(idx),
            None => self.tail = Some(idx),
        }
        self.len += 1;
    }

    /// 删除节点，返回节点是否存在
    pub fn remove(&mut self, score: f64, member: &str) -> bool {
        let (update, _) = self.predecessors(score, member);
        let target = match self.link(update[0], 0).next {
            Some(idx) if self.order(idx, score, member) == Ordering::Equal => idx,
            _ => return false,
        };

        for i in 0..self.level {
            let prev = update[i];
            if self.link(prev, i).next == Some(target) {
                let removed = self.link(target, i);
                let link = &mut self.nodes[prev].links[i];
                link.span = link.span + removed.span - 1;
                link.next = removed.next;
            } else {
                self.nodes[prev].links[i].span -= 1;
            }
        }

        let backward = self.nodes[target].backward;
        match self.link(target, 0).next {
            Some(next) => self.nodes[next].backward = backward,
            None => self.tail = backward,
        }
        while self.level > 1 && self.link(HEAD, self.level - 1).next.is_none() {
            self.level -= 1;
        }

        let slot = &mut self.nodes[target];
        slot.member = String::new();
        slot.links = Vec::new();
        slot.backward = None;
        self.free.push(target);
        self.len -= 1;
        true
    }

    /// 升序排名（从 0 开始）
    pub fn rank(&self, score: f64, member: &str) -> Option<usize> {
        let mut traversed = 0;
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            while let Some(next) = self.link(x, i).next {
                if self.order(next, score, member) == Ordering::Greater {
                    break;
                }
                traversed += self.link(x, i).span;
                x = next;
            }
            if x != HEAD && self.order(x, score, member) == Ordering::Equal {
                return Some(traversed - 1);
            }
        }
        None
    }

    /// 排名为 `rank` 的节点槽位
    fn node_at(&self, rank: usize) -> Option<usize> {
        if rank >= self.len {
            return None;
        }
        let target = rank + 1;
        let mut traversed = 0;
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            while let Some(next) = self.link(x, i).next {
                let span = self.link(x, i).span;
                if traversed + span > target {
                    break;
                }
                traversed += span;
                x = next;
            }
            if traversed == target {
                return Some(x);
            }
        }
        None
    }

    /// 升序排名闭区间 [lo, hi]
    pub fn range(&self, lo: usize, hi: usize) -> Vec<(String, f64)> {
        if lo > hi || hi >= self.len {
            return Vec::new();
        }
        let count = hi - lo + 1;
        let mut out = Vec::with_capacity(count);
        let mut cursor = self.node_at(lo);
        while let Some(idx) = cursor {
            if out.len() == count {
                break;
            }
            let node = &self.nodes[idx];
            out.push((node.member.clone(), node.score));
            cursor = node.links[0].next;
        }
        out
    }

    /// 降序排名闭区间 [lo, hi]，排名 0 为最高分
    pub fn rev_range(&self, lo: usize, hi: usize) -> Vec<(String, f64)> {
        if lo > hi || hi >= self.len {
            return Vec::new();
        }
        let count = hi - lo + 1;
        let mut out = Vec::with_capacity(count);
        let mut cursor = self.node_at(self.len - 1 - lo);
        while let Some(idx) = cursor {
            if out.len() == count {
                break;
            }
            let node = &self.nodes[idx];
            out.push((node.member.clone(), node.score));
            cursor = node.backward;
        }
        out
    }

    /// 按 (分数, 成员) 升序迭代
    pub fn iter(&self) -> impl Iterator<Item = (&String, f64)> + '_ {
        let mut cursor = self.link(HEAD, 0).next;
        std::iter::from_fn(move || {
            let idx = cursor?;
            let node = &self.nodes[idx];
            cursor = node.links[0].next;
            Some((&node.member, node.score))
        })
    }
}
