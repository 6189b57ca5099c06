use mkv_common::store::{ListOperations, SortedSetOperations, Store};
use proptest::prelude::*;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone)]
enum ZOp {
    Add(i32, u8),
    Rem(u8),
    Incr(i32, u8),
}

fn zop() -> impl Strategy<Value = ZOp> {
    prop_oneof![
        (-50i32..50, 0u8..20).prop_map(|(score, m)| ZOp::Add(score, m)),
        (0u8..20).prop_map(ZOp::Rem),
        (-10i32..10, 0u8..20).prop_map(|(delta, m)| ZOp::Incr(delta, m)),
    ]
}

fn member(m: u8) -> String {
    format!("m{:02}", m)
}

/// 按 (分数, 成员) 排序的期望结果
fn expected_order(model: &HashMap<String, f64>) -> Vec<(String, f64)> {
    let mut items: Vec<(String, f64)> = model.iter().map(|(m, s)| (m.clone(), *s)).collect();
    items.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    items
}

proptest! {
    #[test]
    fn zset_matches_model(ops in prop::collection::vec(zop(), 1..80)) {
        let mut store = Store::new();
        let mut model: HashMap<String, f64> = HashMap::new();

        for op in ops {
            match op {
                ZOp::Add(score, m) => {
                    let added = store.zadd("z", vec![(score as f64, member(m))]).unwrap();
                    let was_new = model.insert(member(m), score as f64).is_none();
                    prop_assert_eq!(added, usize::from(was_new));
                }
                ZOp::Rem(m) => {
                    let removed = store.zrem("z", &[member(m)]).unwrap();
                    prop_assert_eq!(removed, usize::from(model.remove(&member(m)).is_some()));
                }
                ZOp::Incr(delta, m) => {
                    let score = store.zincrby("z", delta as f64, &member(m)).unwrap();
                    let entry = model.entry(member(m)).or_insert(0.0);
                    *entry += delta as f64;
                    prop_assert_eq!(score, *entry);
                }
            }
        }

        let expected = expected_order(&model);
        prop_assert_eq!(store.zcard("z").unwrap(), expected.len());
        prop_assert_eq!(store.zrange("z", 0, -1).unwrap(), expected.clone());

        let mut reversed = expected.clone();
        reversed.reverse();
        prop_assert_eq!(store.zrevrange("z", 0, -1).unwrap(), reversed);

        for (rank, (m, _)) in expected.iter().enumerate() {
            prop_assert_eq!(store.zrank("z", m).unwrap(), Some(rank));
            prop_assert_eq!(store.zrevrank("z", m).unwrap(), Some(expected.len() - 1 - rank));
        }
    }

    #[test]
    fn zrange_window_matches_slice(n in 0usize..60, start in -70isize..70, stop in -70isize..70) {
        let mut store = Store::new();
        let entries: Vec<(f64, String)> = (0..n).map(|i| (i as f64, member(i as u8))).collect();
        store.zadd("z", entries).unwrap();

        let len = n as isize;
        let lo = if start < 0 { (len + start).max(0) } else { start };
        let hi = if stop < 0 { len + stop } else { stop.min(len - 1) };
        let expected: Vec<String> = if lo > hi || lo >= len || hi < 0 {
            vec![]
        } else {
            (lo..=hi).map(|i| member(i as u8)).collect()
        };

        let got: Vec<String> = store
            .zrange("z", start, stop)
            .unwrap()
            .into_iter()
            .map(|(m, _)| m)
            .collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn list_matches_deque(ops in prop::collection::vec((0u8..4, 0u16..1000), 1..100)) {
        let mut store = Store::new();
        let mut model: VecDeque<String> = VecDeque::new();

        for (kind, value) in ops {
            let value = value.to_string();
            match kind {
                0 => {
                    store.lpush("l", vec![value.clone()]).unwrap();
                    model.push_front(value);
                }
                1 => {
                    store.rpush("l", vec![value.clone()]).unwrap();
                    model.push_back(value);
                }
                2 => {
                    prop_assert_eq!(store.lpop("l").unwrap(), model.pop_front());
                }
                _ => {
                    prop_assert_eq!(store.rpop("l").unwrap(), model.pop_back());
                }
            }
        }

        let expected: Vec<String> = model.iter().cloned().collect();
        prop_assert_eq!(store.lrange("l", 0, -1).unwrap(), expected);
        prop_assert_eq!(store.llen("l").unwrap(), model.len());
    }
}
