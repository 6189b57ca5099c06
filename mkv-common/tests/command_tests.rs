use mkv_common::command::{Command, CommandError, CommandHandler, Reply};
use mkv_common::store::StoreManager;

fn handler() -> CommandHandler {
    CommandHandler::new(StoreManager::with_shards(4))
}

fn bulk(value: &str) -> Reply {
    Reply::Bulk(Some(value.to_string()))
}

fn array(items: &[&str]) -> Reply {
    Reply::Array(items.iter().map(|s| Some(s.to_string())).collect())
}

#[test]
fn test_command_parsing() {
    let cmd = CommandHandler::parse_command("HSET user name alice").unwrap();
    assert_eq!(cmd, Command::HSet("user".into(), "name".into(), "alice".into()));

    let cmd = CommandHandler::parse_command("lpush list1 a b c").unwrap();
    assert_eq!(cmd, Command::LPush("list1".into(), vec!["a".into(), "b".into(), "c".into()]));

    let cmd = CommandHandler::parse_command("lrange list1 0 -1").unwrap();
    assert_eq!(cmd, Command::LRange("list1".into(), 0, -1));

    let cmd = CommandHandler::parse_command("zadd z 1.5 a -inf b").unwrap();
    assert_eq!(
        cmd,
        Command::ZAdd("z".into(), vec![(1.5, "a".into()), (f64::NEG_INFINITY, "b".into())])
    );

    let cmd = CommandHandler::parse_command("zrevrange z 0 -1 withscores").unwrap();
    assert_eq!(
        cmd,
        Command::ZRevRange {
            key: "z".into(),
            start: 0,
            stop: -1,
            with_scores: true,
        }
    );

    let cmd = CommandHandler::parse_command("hmset h f1 v1 f2 v2").unwrap();
    assert_eq!(
        cmd,
        Command::HMSet(
            "h".into(),
            vec![("f1".into(), "v1".into()), ("f2".into(), "v2".into())]
        )
    );

    let cmd = CommandHandler::parse_command("del a b").unwrap();
    assert_eq!(cmd, Command::Del(vec!["a".into(), "b".into()]));

    assert_eq!(CommandHandler::parse_command("ping").unwrap(), Command::Ping);
    assert_eq!(CommandHandler::parse_command("help").unwrap(), Command::Help);
    assert_eq!(
        CommandHandler::parse_command("help zadd").unwrap(),
        Command::HelpCommand("zadd".into())
    );
}

#[test]
fn test_parse_errors() {
    assert!(matches!(CommandHandler::parse_command("   "), Err(CommandError::Empty)));
    assert!(matches!(
        CommandHandler::parse_command("frobnicate k"),
        Err(CommandError::UnknownCommand(name)) if name == "frobnicate"
    ));
    assert!(matches!(
        CommandHandler::parse_command("hget onlykey"),
        Err(CommandError::WrongArity { usage, .. }) if usage == "HGET key field"
    ));
    assert!(matches!(
        CommandHandler::parse_command("hmset h f1"),
        Err(CommandError::WrongArity { .. })
    ));
    assert!(matches!(
        CommandHandler::parse_command("zadd z 1 a 2"),
        Err(CommandError::WrongArity { .. })
    ));
    assert!(matches!(
        CommandHandler::parse_command("zadd z abc a"),
        Err(CommandError::NotAFloat(raw)) if raw == "abc"
    ));
    assert!(matches!(
        CommandHandler::parse_command("zadd z nan a"),
        Err(CommandError::NotAFloat(_))
    ));
    assert!(matches!(
        CommandHandler::parse_command("lrange l zero 1"),
        Err(CommandError::NotAnInteger(_))
    ));
    assert!(matches!(
        CommandHandler::parse_command("zrange z 0 1 withcheese"),
        Err(CommandError::Syntax(_))
    ));
}

#[test]
fn test_hash_commands() {
    let handler = handler();
    assert_eq!(handler.handle_line("hset h f1 v1"), Reply::Integer(1));
    assert_eq!(handler.handle_line("hset h f1 v2"), Reply::Integer(0));
    assert_eq!(handler.handle_line("hget h f1"), bulk("v2"));
    assert_eq!(handler.handle_line("hget h nope"), Reply::Bulk(None));
    assert_eq!(handler.handle_line("hmset h f2 v2 f3 v3"), Reply::Ok);
    assert_eq!(handler.handle_line("hlen h"), Reply::Integer(3));
    assert_eq!(handler.handle_line("hkeys h"), array(&["f1", "f2", "f3"]));
    assert_eq!(handler.handle_line("hgetall h"), array(&["f1", "v2", "f2", "v2", "f3", "v3"]));
    assert_eq!(
        handler.handle_line("hmget h f3 nope"),
        Reply::Array(vec![Some("v3".into()), None])
    );
    assert_eq!(handler.handle_line("hincrby h n 7"), Reply::Integer(7));
    assert_eq!(handler.handle_line("hdel h f1 f2 f3 n"), Reply::Integer(4));
    assert_eq!(handler.handle_line("exists h"), Reply::Integer(0));
}

#[test]
fn test_list_commands() {
    let handler = handler();
    assert_eq!(handler.handle_line("rpush l a b c"), Reply::Integer(3));
    assert_eq!(handler.handle_line("lpush l z"), Reply::Integer(4));
    assert_eq!(handler.handle_line("lrange l 0 -1"), array(&["z", "a", "b", "c"]));
    assert_eq!(handler.handle_line("lrange l 3 1"), Reply::Array(vec![]));
    assert_eq!(handler.handle_line("lindex l -1"), bulk("c"));
    assert_eq!(handler.handle_line("lset l 0 y"), Reply::Ok);
    assert_eq!(handler.handle_line("lpop l"), bulk("y"));
    assert_eq!(handler.handle_line("llen l"), Reply::Integer(3));
    assert!(matches!(handler.handle_line("lset l 9 x"), Reply::Error(_)));
}

#[test]
fn test_set_commands() {
    let handler = handler();
    assert_eq!(handler.handle_line("sadd a 1 2 3"), Reply::Integer(3));
    assert_eq!(handler.handle_line("sadd a 3"), Reply::Integer(0));
    assert_eq!(handler.handle_line("sadd b 2 3 4"), Reply::Integer(3));
    assert_eq!(handler.handle_line("sdiff a b"), array(&["1"]));
    assert_eq!(handler.handle_line("sinter a b"), array(&["2", "3"]));
    assert_eq!(handler.handle_line("sunion a b"), array(&["1", "2", "3", "4"]));
    assert_eq!(handler.handle_line("smembers a"), array(&["1", "2", "3"]));
    assert_eq!(handler.handle_line("sismember a 1"), Reply::Integer(1));
    assert_eq!(handler.handle_line("srem a 1 9"), Reply::Integer(1));
    assert_eq!(handler.handle_line("scard a"), Reply::Integer(2));
}

#[test]
fn test_sorted_set_commands() {
    let handler = handler();
    assert_eq!(handler.handle_line("zadd z 1 a 2 b 3 c"), Reply::Integer(3));
    assert_eq!(handler.handle_line("zadd z 10 a"), Reply::Integer(0));
    assert_eq!(handler.handle_line("zrange z 0 -1"), array(&["b", "c", "a"]));
    assert_eq!(
        handler.handle_line("zrange z 0 0 WITHSCORES"),
        array(&["b", "2"])
    );
    assert_eq!(handler.handle_line("zrevrange z 0 1"), array(&["a", "c"]));
    assert_eq!(handler.handle_line("zscore z a"), bulk("10"));
    assert_eq!(handler.handle_line("zscore z nope"), Reply::Bulk(None));
    assert_eq!(handler.handle_line("zrank z a"), Reply::Integer(2));
    assert_eq!(handler.handle_line("zrevrank z a"), Reply::Integer(0));
    assert_eq!(handler.handle_line("zrank z nope"), Reply::Bulk(None));
    assert_eq!(handler.handle_line("zincrby z 0.5 b"), bulk("2.5"));
    assert_eq!(handler.handle_line("zrem z a b c"), Reply::Integer(3));
    assert_eq!(handler.handle_line("zcard z"), Reply::Integer(0));
}

#[test]
fn test_generic_commands() {
    let handler = handler();
    handler.handle_line("sadd s m");
    handler.handle_line("rpush l v");

    assert_eq!(handler.handle_line("exists s l missing"), Reply::Integer(2));
    assert_eq!(handler.handle_line("type s"), bulk("set"));
    assert_eq!(handler.handle_line("type missing"), Reply::Bulk(None));
    assert_eq!(handler.handle_line("ttl s"), Reply::Integer(-1));
    assert_eq!(handler.handle_line("ttl missing"), Reply::Integer(-2));
    assert_eq!(handler.handle_line("expire s 100"), Reply::Integer(1));
    assert_eq!(handler.handle_line("expire missing 100"), Reply::Integer(0));
    assert_eq!(handler.handle_line("ttl s"), Reply::Integer(100));
    assert_eq!(handler.handle_line("persist s"), Reply::Integer(1));
    assert_eq!(handler.handle_line("dbsize"), Reply::Integer(2));
    assert_eq!(handler.handle_line("del s l missing"), Reply::Integer(2));
    assert_eq!(handler.handle_line("dbsize"), Reply::Integer(0));

    handler.handle_line("sadd s m");
    assert_eq!(handler.handle_line("flushdb"), Reply::Ok);
    assert_eq!(handler.handle_line("exists s"), Reply::Integer(0));
    assert_eq!(handler.handle_line("ping"), Reply::Pong);
    assert_eq!(handler.handle_line("echo hello world"), bulk("hello world"));
}

#[test]
fn test_wrong_type_reply() {
    let handler = handler();
    handler.handle_line("rpush l v");
    match handler.handle_line("hset l f v") {
        Reply::Error(msg) => assert!(msg.starts_with("WRONGTYPE"), "{}", msg),
        other => panic!("unexpected reply: {:?}", other),
    }
    assert_eq!(handler.handle_line("type l"), bulk("list"));
}

#[test]
fn test_reply_rendering() {
    assert_eq!(Reply::Ok.to_string(), "OK");
    assert_eq!(Reply::Integer(-2).to_string(), "-2");
    assert_eq!(Reply::Bulk(None).to_string(), "(nil)");
    assert_eq!(Reply::Array(vec![]).to_string(), "(empty list)");
    assert_eq!(
        Reply::Array(vec![Some("a".into()), None]).to_string(),
        "a\n(nil)"
    );
    assert_eq!(Reply::Error("boom".into()).to_string(), "ERROR: boom");
    assert_eq!(
        handler().handle_line("nope").to_string(),
        "ERROR: Unknown command: nope"
    );
}

#[test]
fn test_help() {
    let handler = handler();
    match handler.handle_line("help") {
        Reply::Bulk(Some(text)) => {
            assert!(text.contains("ZADD key score member"));
            assert!(text.contains("HGETALL key"));
        }
        other => panic!("unexpected reply: {:?}", other),
    }
    assert_eq!(
        handler.handle_line("help lpop"),
        bulk("LPOP key - 获取并删除左端数据")
    );
}

#[test]
fn test_info_and_quit() {
    assert_eq!(CommandHandler::parse_command("INFO").unwrap(), Command::Info);
    assert_eq!(CommandHandler::parse_command("quit").unwrap(), Command::Quit);
    assert!(matches!(
        CommandHandler::parse_command("quit now"),
        Err(CommandError::WrongArity { usage, .. }) if usage == "QUIT"
    ));

    let handler = handler();
    // 命令层对 quit 只回复 OK，断开由连接层完成
    assert_eq!(handler.handle_line("quit"), Reply::Ok);

    handler.handle_line("sadd s a");
    handler.handle_line("rpush l x");
    handler.handle_line("expire l 100");
    match handler.handle_line("info") {
        Reply::Array(lines) => {
            let lines: Vec<String> = lines.into_iter().flatten().collect();
            assert_eq!(lines[0], "# Server");
            assert!(lines.contains(&"shards: 4".to_string()));
            assert!(lines.contains(&"keys: 2".to_string()));
            assert!(lines.contains(&"expires: 1".to_string()));
        }
        other => panic!("unexpected reply: {:?}", other),
    }
}
