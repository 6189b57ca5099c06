use mkv_common::store::{
    now_ms, HashOperations, KeyOperations, ListOperations, SetOperations, SortedSetOperations,
    Store, StoreManager,
};
use std::thread::sleep;
use std::time::Duration;

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(f, v)| (f.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_hash_expires_after_ttl() {
    let mut store = Store::new();
    store
        .hmset("h", pairs(&[("f1", "v1"), ("f2", "v2"), ("f3", "v3")]))
        .unwrap();

    assert!(store.expire("h", 5));
    let ttl = store.ttl("h");
    assert!(ttl > 0 && ttl <= 5, "ttl = {}", ttl);
    assert_eq!(store.hlen("h"), Ok(3));

    sleep(Duration::from_millis(5200));

    assert_eq!(store.hlen("h"), Ok(0));
    assert!(!store.exists("h"));
    assert_eq!(store.key_type("h"), None);
    assert_eq!(store.ttl("h"), -2);
}

#[test]
fn test_every_kind_expires() {
    let mut store = Store::new();
    store.rpush("l", vec!["a".into()]).unwrap();
    store.sadd("s", vec!["a".into()]).unwrap();
    store.zadd("z", vec![(1.0, "a".into())]).unwrap();

    for key in ["l", "s", "z"] {
        assert!(store.pexpire(key, 100));
    }
    assert_eq!(store.llen("l"), Ok(1));
    assert_eq!(store.scard("s"), Ok(1));
    assert_eq!(store.zcard("z"), Ok(1));

    sleep(Duration::from_millis(200));

    assert_eq!(store.llen("l"), Ok(0));
    assert_eq!(store.scard("s"), Ok(0));
    assert_eq!(store.zcard("z"), Ok(0));
    // 过期后可以重新以其他类型创建
    assert_eq!(store.hset("l", "f".into(), "v".into()), Ok(true));
}

#[test]
fn test_ttl_sentinels() {
    let mut store = Store::new();
    assert_eq!(store.ttl("missing"), -2);
    assert_eq!(store.pttl("missing"), -2);
    assert!(!store.expire("missing", 10));

    store.sadd("s", vec!["m".into()]).unwrap();
    assert_eq!(store.ttl("s"), -1);
    assert_eq!(store.pttl("s"), -1);

    assert!(store.pexpire("s", 5000));
    let pttl = store.pttl("s");
    assert!(pttl > 0 && pttl <= 5000, "pttl = {}", pttl);
    assert_eq!(store.ttl("s"), 5);

    assert!(store.persist("s"));
    assert!(!store.persist("s"));
    assert_eq!(store.ttl("s"), -1);
}

#[test]
fn test_absolute_expiry() {
    let mut store = Store::new();
    store.sadd("a", vec!["m".into()]).unwrap();
    store.sadd("b", vec!["m".into()]).unwrap();

    assert!(store.pexpire_at("a", now_ms() + 10_000));
    let pttl = store.pttl("a");
    assert!(pttl > 9_000 && pttl <= 10_000, "pttl = {}", pttl);

    assert!(store.expire_at("b", now_ms() / 1000 + 100));
    assert!(store.ttl("b") > 90);
}

#[test]
fn test_past_deadline_deletes_immediately() {
    let mut store = Store::new();
    store.sadd("a", vec!["m".into()]).unwrap();
    store.sadd("b", vec!["m".into()]).unwrap();
    store.sadd("c", vec!["m".into()]).unwrap();

    assert!(store.expire_at("a", 1));
    assert!(!store.exists("a"));
    assert!(store.pexpire("b", -1));
    assert!(!store.exists("b"));
    assert!(store.expire("c", 0));
    assert!(!store.exists("c"));
}

#[test]
fn test_delete_clears_expiry() {
    let mut store = Store::new();
    store.sadd("k", vec!["m".into()]).unwrap();
    store.expire("k", 100);
    assert!(store.delete("k"));
    assert!(!store.delete("k"));

    store.sadd("k", vec!["m".into()]).unwrap();
    assert_eq!(store.ttl("k"), -1);
}

#[test]
fn test_emptied_key_drops_expiry() {
    let mut store = Store::new();
    store.rpush("l", vec!["a".into()]).unwrap();
    store.expire("l", 100);
    store.lpop("l").unwrap();

    store.rpush("l", vec!["b".into()]).unwrap();
    assert_eq!(store.ttl("l"), -1);
}

#[test]
fn test_sweeper_evicts_without_access() {
    let manager = StoreManager::with_shards(4);
    for i in 0..10 {
        let key = format!("k{}", i);
        manager.sadd(&key, vec!["m".into()]).unwrap();
        assert!(manager.pexpire(&key, 50));
    }
    manager.sadd("keep", vec!["m".into()]).unwrap();

    let sweeper = manager.start_expiry_sweeper(Duration::from_millis(20), 100);
    sleep(Duration::from_millis(300));
    sweeper.stop();

    // 后台线程已清理全部过期键
    assert_eq!(manager.purge_expired(100), 0);
    assert_eq!(manager.dbsize(), 1);
    assert_eq!(manager.exists(&["keep".to_string()]), 1);
}
