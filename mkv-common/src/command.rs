use std::fmt;

use log::debug;
use thiserror::Error;

use crate::store::{StoreError, StoreManager};

/// 命令表：(命令, 用法, 说明)
const COMMANDS: &[(&str, &str, &str)] = &[
    ("exists", "EXISTS key [key ...]", "返回存在的键的数量"),
    ("type", "TYPE key", "获取键的数据类型"),
    ("del", "DEL key [key ...]", "删除键，返回实际删除的数量"),
    ("expire", "EXPIRE key seconds", "设置相对过期时间(秒)"),
    ("pexpire", "PEXPIRE key milliseconds", "设置相对过期时间(毫秒)"),
    ("expireat", "EXPIREAT key timestamp", "设置绝对过期时间(秒级时间戳)"),
    ("pexpireat", "PEXPIREAT key timestamp", "设置绝对过期时间(毫秒级时间戳)"),
    ("ttl", "TTL key", "剩余生存时间(秒)"),
    ("pttl", "PTTL key", "剩余生存时间(毫秒)"),
    ("persist", "PERSIST key", "移除过期时间"),
    ("hset", "HSET key field value", "存储哈希表字段"),
    ("hget", "HGET key field", "获取哈希表字段值"),
    ("hexists", "HEXISTS key field", "检查哈希表字段是否存在"),
    ("hstrlen", "HSTRLEN key field", "获取哈希表字段值的长度"),
    ("hlen", "HLEN key", "获取哈希表字段数量"),
    ("hmset", "HMSET key field value [field value ...]", "批量设置哈希表字段"),
    ("hmget", "HMGET key field [field ...]", "批量获取哈希表字段值"),
    ("hkeys", "HKEYS key", "按插入顺序获取所有字段"),
    ("hvals", "HVALS key", "按插入顺序获取所有值"),
    ("hgetall", "HGETALL key", "按插入顺序获取所有字段和值"),
    ("hdel", "HDEL key field [field ...]", "删除哈希表字段"),
    ("hincrby", "HINCRBY key field increment", "哈希表字段整数值加上增量"),
    ("lpush", "LPUSH key value [value ...]", "在列表左端添加数据"),
    ("rpush", "RPUSH key value [value ...]", "在列表右端添加数据"),
    ("lpop", "LPOP key", "获取并删除左端数据"),
    ("rpop", "RPOP key", "获取并删除右端数据"),
    ("llen", "LLEN key", "获取列表长度"),
    ("lindex", "LINDEX key index", "根据索引获取元素"),
    ("lrange", "LRANGE key start stop", "获取 start 到 stop 位置的数据"),
    ("lset", "LSET key index value", "根据索引设置元素"),
    ("sadd", "SADD key member [member ...]", "添加集合成员"),
    ("srem", "SREM key member [member ...]", "移除集合成员"),
    ("scard", "SCARD key", "获取集合成员数量"),
    ("sismember", "SISMEMBER key member", "检查成员是否在集合中"),
    ("smembers", "SMEMBERS key", "获取集合所有成员"),
    ("sdiff", "SDIFF key [key ...]", "集合差集"),
    ("sunion", "SUNION key [key ...]", "集合并集"),
    ("sinter", "SINTER key [key ...]", "集合交集"),
    ("zadd", "ZADD key score member [score member ...]", "添加有序集合成员"),
    ("zrem", "ZREM key member [member ...]", "移除有序集合成员"),
    ("zcard", "ZCARD key", "获取有序集合成员数量"),
    ("zscore", "ZSCORE key member", "获取成员分数"),
    ("zrange", "ZRANGE key start stop [WITHSCORES]", "按分数升序获取排名区间"),
    ("zrevrange", "ZREVRANGE key start stop [WITHSCORES]", "按分数降序获取排名区间"),
    ("zrank", "ZRANK key member", "获取成员升序排名"),
    ("zrevrank", "ZREVRANK key member", "获取成员降序排名"),
    ("zincrby", "ZINCRBY key increment member", "成员分数加上增量"),
    ("dbsize", "DBSIZE", "获取键的数量"),
    ("flushdb", "FLUSHDB", "清空所有键"),
    ("ping", "PING", "测试服务器连接"),
    ("echo", "ECHO message", "原样返回消息"),
    ("info", "INFO", "获取服务器与键空间信息"),
    ("quit", "QUIT", "关闭当前连接"),
    ("help", "HELP [command]", "获取命令帮助"),
];

fn usage_of(verb: &str) -> &'static str {
    COMMANDS
        .iter()
        .find(|(name, _, _)| *name == verb)
        .map_or("", |(_, usage, _)| *usage)
}

/// 命令解析与执行错误
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Usage: {usage}")]
    WrongArity {
        command: String,
        usage: &'static str,
    },
    #[error("'{0}' 不是有效的整数")]
    NotAnInteger(String),
    #[error("'{0}' 不是有效的数字")]
    NotAFloat(String),
    #[error("语法错误: {0}")]
    Syntax(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

// 表示解析后的命令
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // 通用命令
    Exists(Vec<String>),
    Type(String),
    Del(Vec<String>),
    Expire(String, i64),
    PExpire(String, i64),
    ExpireAt(String, i64),
    PExpireAt(String, i64),
    Ttl(String),
    PTtl(String),
    Persist(String),

    // 哈希命令
    HSet(String, String, String),
    HGet(String, String),
    HExists(String, String),
    HStrLen(String, String),
    HLen(String),
    HMSet(String, Vec<(String, String)>),
    HMGet(String, Vec<String>),
    HKeys(String),
    HVals(String),
    HGetAll(String),
    HDel(String, Vec<String>),
    HIncrBy(String, String, i64),

    // 列表命令
    LPush(String, Vec<String>),
    RPush(String, Vec<String>),
    LPop(String),
    RPop(String),
    LLen(String),
    LIndex(String, isize),
    LRange(String, isize, isize),
    LSet(String, isize, String),

    // 集合命令
    SAdd(String, Vec<String>),
    SRem(String, Vec<String>),
    SCard(String),
    SIsMember(String, String),
    SMembers(String),
    SDiff(Vec<String>),
    SUnion(Vec<String>),
    SInter(Vec<String>),

    // 有序集合命令
    ZAdd(String, Vec<(f64, String)>),
    ZRem(String, Vec<String>),
    ZCard(String),
    ZScore(String, String),
    ZRange {
        key: String,
        start: isize,
        stop: isize,
        with_scores: bool,
    },
    ZRevRange {
        key: String,
        start: isize,
        stop: isize,
        with_scores: bool,
    },
    ZRank(String, String),
    ZRevRank(String, String),
    ZIncrBy(String, f64, String),

    // 其他命令
    DbSize,
    FlushDb,
    Ping,
    Echo(String),
    Info,
    Quit,
    Help,
    HelpCommand(String),
}

/// 命令执行结果
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Ok,
    Pong,
    Integer(i64),
    Bulk(Option<String>),
    Array(Vec<Option<String>>),
    Error(String),
}

impl From<bool> for Reply {
    fn from(value: bool) -> Self {
        Reply::Integer(i64::from(value))
    }
}

impl From<usize> for Reply {
    fn from(value: usize) -> Self {
        Reply::Integer(value as i64)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => f.write_str("OK"),
            Reply::Pong => f.write_str("PONG"),
            Reply::Integer(n) => write!(f, "{}", n),
            Reply::Bulk(Some(value)) => f.write_str(value),
            Reply::Bulk(None) => f.write_str("(nil)"),
            Reply::Array(items) if items.is_empty() => f.write_str("(empty list)"),
            Reply::Array(items) => {
                let lines: Vec<&str> = items
                    .iter()
                    .map(|item| item.as_deref().unwrap_or("(nil)"))
                    .collect();
                f.write_str(&lines.join("\n"))
            }
            Reply::Error(msg) => write!(f, "ERROR: {}", msg),
        }
    }
}

fn check_arity(
    verb: &str,
    args: &[&str],
    min: usize,
    max: Option<usize>,
) -> Result<(), CommandError> {
    let too_many = max.map_or(false, |max| args.len() > max);
    if args.len() < min || too_many {
        return Err(CommandError::WrongArity {
            command: verb.to_string(),
            usage: usage_of(verb),
        });
    }
    Ok(())
}

fn exact(verb: &str, args: &[&str], n: usize) -> Result<(), CommandError> {
    check_arity(verb, args, n, Some(n))
}

fn at_least(verb: &str, args: &[&str], n: usize) -> Result<(), CommandError> {
    check_arity(verb, args, n, None)
}

fn parse_int<T: std::str::FromStr>(raw: &str) -> Result<T, CommandError> {
    raw.parse::<T>()
        .map_err(|_| CommandError::NotAnInteger(raw.to_string()))
}

/// 接受 inf/-inf，拒绝 NaN
fn parse_float(raw: &str) -> Result<f64, CommandError> {
    match raw.parse::<f64>() {
        Ok(value) if !value.is_nan() => Ok(value),
        _ => Err(CommandError::NotAFloat(raw.to_string())),
    }
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

fn parse_with_scores(verb: &str, args: &[&str]) -> Result<bool, CommandError> {
    check_arity(verb, args, 3, Some(4))?;
    match args.get(3) {
        None => Ok(false),
        Some(flag) if flag.eq_ignore_ascii_case("withscores") => Ok(true),
        Some(flag) => Err(CommandError::Syntax(format!("未知选项 '{}'", flag))),
    }
}

fn format_score(score: f64) -> String {
    score.to_string()
}

fn scored(items: Vec<(String, f64)>, with_scores: bool) -> Vec<Option<String>> {
    let mut out = Vec::with_capacity(if with_scores { items.len() * 2 } else { items.len() });
    for (member, score) in items {
        out.push(Some(member));
        if with_scores {
            out.push(Some(format_score(score)));
        }
    }
    out
}

fn strings(items: Vec<String>) -> Vec<Option<String>> {
    items.into_iter().map(Some).collect()
}

// 命令处理器
#[derive(Debug, Clone)]
pub struct CommandHandler {
    store_manager: StoreManager,
}

impl CommandHandler {
    pub fn new(store_manager: StoreManager) -> Self {
        CommandHandler { store_manager }
    }

    /// 解析一行文本命令
    pub fn parse_command(input: &str) -> Result<Command, CommandError> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        Self::parse_parts(&parts)
    }

    /// 解析已经切分好的命令参数，命令名不区分大小写
    pub fn parse_parts(parts: &[&str]) -> Result<Command, CommandError> {
        let (name, args) = parts.split_first().ok_or(CommandError::Empty)?;
        let verb = name.to_lowercase();
        let v = verb.as_str();

        let command = match v {
            // 通用命令
            "exists" => {
                at_least(v, args, 1)?;
                Command::Exists(owned(args))
            }
            "type" => {
                exact(v, args, 1)?;
                Command::Type(args[0].to_string())
            }
            "del" => {
                at_least(v, args, 1)?;
                Command::Del(owned(args))
            }
            "expire" | "pexpire" | "expireat" | "pexpireat" => {
                exact(v, args, 2)?;
                let key = args[0].to_string();
                let amount = parse_int::<i64>(args[1])?;
                match v {
                    "expire" => Command::Expire(key, amount),
                    "pexpire" => Command::PExpire(key, amount),
                    "expireat" => Command::ExpireAt(key, amount),
                    _ => Command::PExpireAt(key, amount),
                }
            }
            "ttl" => {
                exact(v, args, 1)?;
                Command::Ttl(args[0].to_string())
            }
            "pttl" => {
                exact(v, args, 1)?;
                Command::PTtl(args[0].to_string())
            }
            "persist" => {
                exact(v, args, 1)?;
                Command::Persist(args[0].to_string())
            }

            // 哈希命令
            "hset" => {
                at_least(v, args, 3)?;
                Command::HSet(args[0].to_string(), args[1].to_string(), args[2..].join(" "))
            }
            "hget" => {
                exact(v, args, 2)?;
                Command::HGet(args[0].to_string(), args[1].to_string())
            }
            "hexists" => {
                exact(v, args, 2)?;
                Command::HExists(args[0].to_string(), args[1].to_string())
            }
            "hstrlen" => {
                exact(v, args, 2)?;
                Command::HStrLen(args[0].to_string(), args[1].to_string())
            }
            "hlen" => {
                exact(v, args, 1)?;
                Command::HLen(args[0].to_string())
            }
            "hmset" => {
                at_least(v, args, 3)?;
                if (args.len() - 1) % 2 != 0 {
                    return Err(CommandError::WrongArity {
                        command: verb.clone(),
                        usage: usage_of(v),
                    });
                }
                let pairs = args[1..]
                    .chunks(2)
                    .map(|pair| (pair[0].to_string(), pair[1].to_string()))
                    .collect();
                Command::HMSet(args[0].to_string(), pairs)
            }
            "hmget" => {
                at_least(v, args, 2)?;
                Command::HMGet(args[0].to_string(), owned(&args[1..]))
            }
            "hkeys" => {
                exact(v, args, 1)?;
                Command::HKeys(args[0].to_string())
            }
            "hvals" => {
                exact(v, args, 1)?;
                Command::HVals(args[0].to_string())
            }
            "hgetall" => {
                exact(v, args, 1)?;
                Command::HGetAll(args[0].to_string())
            }
            "hdel" => {
                at_least(v, args, 2)?;
                Command::HDel(args[0].to_string(), owned(&args[1..]))
            }
            "hincrby" => {
                exact(v, args, 3)?;
                Command::HIncrBy(args[0].to_string(), args[1].to_string(), parse_int(args[2])?)
            }

            // 列表命令
            "lpush" => {
                at_least(v, args, 2)?;
                Command::LPush(args[0].to_string(), owned(&args[1..]))
            }
            "rpush" => {
                at_least(v, args, 2)?;
                Command::RPush(args[0].to_string(), owned(&args[1..]))
            }
            "lpop" => {
                exact(v, args, 1)?;
                Command::LPop(args[0].to_string())
            }
            "rpop" => {
                exact(v, args, 1)?;
                Command::RPop(args[0].to_string())
            }
            "llen" => {
                exact(v, args, 1)?;
                Command::LLen(args[0].to_string())
            }
            "lindex" => {
                exact(v, args, 2)?;
                Command::LIndex(args[0].to_string(), parse_int(args[1])?)
            }
            "lrange" => {
                exact(v, args, 3)?;
                Command::LRange(args[0].to_string(), parse_int(args[1])?, parse_int(args[2])?)
            }
            "lset" => {
                at_least(v, args, 3)?;
                Command::LSet(args[0].to_string(), parse_int(args[1])?, args[2..].join(" "))
            }

            // 集合命令
            "sadd" => {
                at_least(v, args, 2)?;
                Command::SAdd(args[0].to_string(), owned(&args[1..]))
            }
            "srem" => {
                at_least(v, args, 2)?;
                Command::SRem(args[0].to_string(), owned(&args[1..]))
            }
            "scard" => {
                exact(v, args, 1)?;
                Command::SCard(args[0].to_string())
            }
            "sismember" => {
                exact(v, args, 2)?;
                Command::SIsMember(args[0].to_string(), args[1].to_string())
            }
            "smembers" => {
                exact(v, args, 1)?;
                Command::SMembers(args[0].to_string())
            }
            "sdiff" => {
                at_least(v, args, 1)?;
                Command::SDiff(owned(args))
            }
            "sunion" => {
                at_least(v, args, 1)?;
                Command::SUnion(owned(args))
            }
            "sinter" => {
                at_least(v, args, 1)?;
                Command::SInter(owned(args))
            }

            // 有序集合命令
            "zadd" => {
                at_least(v, args, 3)?;
                if (args.len() - 1) % 2 != 0 {
                    return Err(CommandError::WrongArity {
                        command: verb.clone(),
                        usage: usage_of(v),
                    });
                }
                let entries = args[1..]
                    .chunks(2)
                    .map(|pair| Ok((parse_float(pair[0])?, pair[1].to_string())))
                    .collect::<Result<Vec<_>, CommandError>>()?;
                Command::ZAdd(args[0].to_string(), entries)
            }
            "zrem" => {
                at_least(v, args, 2)?;
                Command::ZRem(args[0].to_string(), owned(&args[1..]))
            }
            "zcard" => {
                exact(v, args, 1)?;
                Command::ZCard(args[0].to_string())
            }
            "zscore" => {
                exact(v, args, 2)?;
                Command::ZScore(args[0].to_string(), args[1].to_string())
            }
            "zrange" | "zrevrange" => {
                let with_scores = parse_with_scores(v, args)?;
                let key = args[0].to_string();
                let start = parse_int(args[1])?;
                let stop = parse_int(args[2])?;
                if v == "zrange" {
                    Command::ZRange { key, start, stop, with_scores }
                } else {
                    Command::ZRevRange { key, start, stop, with_scores }
                }
            }
            "zrank" => {
                exact(v, args, 2)?;
                Command::ZRank(args[0].to_string(), args[1].to_string())
            }
            "zrevrank" => {
                exact(v, args, 2)?;
                Command::ZRevRank(args[0].to_string(), args[1].to_string())
            }
            "zincrby" => {
                exact(v, args, 3)?;
                Command::ZIncrBy(args[0].to_string(), parse_float(args[1])?, args[2].to_string())
            }

            // 其他命令
            "dbsize" => {
                exact(v, args, 0)?;
                Command::DbSize
            }
            "flushdb" => {
                exact(v, args, 0)?;
                Command::FlushDb
            }
            "ping" => Command::Ping,
            "echo" => {
                at_least(v, args, 1)?;
                Command::Echo(args.join(" "))
            }
            "info" => {
                exact(v, args, 0)?;
                Command::Info
            }
            "quit" => {
                exact(v, args, 0)?;
                Command::Quit
            }
            "help" => match args.first() {
                Some(name) => Command::HelpCommand(name.to_string()),
                None => Command::Help,
            },
            _ => return Err(CommandError::UnknownCommand(name.to_string())),
        };
        Ok(command)
    }

    /// 解析并执行一行命令，解析失败同样以错误回复返回
    pub fn handle_line(&self, input: &str) -> Reply {
        match Self::parse_command(input) {
            Ok(command) => self.execute_command(command),
            Err(e) => Reply::Error(e.to_string()),
        }
    }

    // 执行命令
    pub fn execute_command(&self, command: Command) -> Reply {
        debug!("执行命令: {:?}", command);
        match self.dispatch(command) {
            Ok(reply) => reply,
            Err(e) => Reply::Error(e.to_string()),
        }
    }

    fn dispatch(&self, command: Command) -> Result<Reply, CommandError> {
        let store = &self.store_manager;
        let reply: Reply = match command {
            Command::Exists(keys) => store.exists(&keys).into(),
            Command::Type(key) => Reply::Bulk(store.key_type(&key).map(|kind| kind.to_string())),
            Command::Del(keys) => store.delete(&keys).into(),
            Command::Expire(key, seconds) => store.expire(&key, seconds).into(),
            Command::PExpire(key, millis) => store.pexpire(&key, millis).into(),
            Command::ExpireAt(key, secs) => store.expire_at(&key, secs).into(),
            Command::PExpireAt(key, millis) => store.pexpire_at(&key, millis).into(),
            Command::Ttl(key) => Reply::Integer(store.ttl(&key)),
            Command::PTtl(key) => Reply::Integer(store.pttl(&key)),
            Command::Persist(key) => store.persist(&key).into(),

            Command::HSet(key, field, value) => store.hset(&key, field, value)?.into(),
            Command::HGet(key, field) => Reply::Bulk(store.hget(&key, &field)?),
            Command::HExists(key, field) => store.hexists(&key, &field)?.into(),
            Command::HStrLen(key, field) => store.hstrlen(&key, &field)?.into(),
            Command::HLen(key) => store.hlen(&key)?.into(),
            Command::HMSet(key, pairs) => {
                store.hmset(&key, pairs)?;
                Reply::Ok
            }
            Command::HMGet(key, fields) => Reply::Array(store.hmget(&key, &fields)?),
            Command::HKeys(key) => Reply::Array(strings(store.hkeys(&key)?)),
            Command::HVals(key) => Reply::Array(strings(store.hvals(&key)?)),
            Command::HGetAll(key) => Reply::Array(
                store
                    .hgetall(&key)?
                    .into_iter()
                    .flat_map(|(field, value)| [Some(field), Some(value)])
                    .collect(),
            ),
            Command::HDel(key, fields) => store.hdel(&key, &fields)?.into(),
            Command::HIncrBy(key, field, delta) => Reply::Integer(store.hincrby(&key, &field, delta)?),

            Command::LPush(key, values) => store.lpush(&key, values)?.into(),
            Command::RPush(key, values) => store.rpush(&key, values)?.into(),
            Command::LPop(key) => Reply::Bulk(store.lpop(&key)?),
            Command::RPop(key) => Reply::Bulk(store.rpop(&key)?),
            Command::LLen(key) => store.llen(&key)?.into(),
            Command::LIndex(key, index) => Reply::Bulk(store.lindex(&key, index)?),
            Command::LRange(key, start, stop) => Reply::Array(strings(store.lrange(&key, start, stop)?)),
            Command::LSet(key, index, value) => {
                store.lset(&key, index, value)?;
                Reply::Ok
            }

            Command::SAdd(key, members) => store.sadd(&key, members)?.into(),
            Command::SRem(key, members) => store.srem(&key, &members)?.into(),
            Command::SCard(key) => store.scard(&key)?.into(),
            Command::SIsMember(key, member) => store.sismember(&key, &member)?.into(),
            Command::SMembers(key) => Reply::Array(sorted(store.smembers(&key)?)),
            Command::SDiff(keys) => Reply::Array(sorted(store.sdiff(&keys)?)),
            Command::SUnion(keys) => Reply::Array(sorted(store.sunion(&keys)?)),
            Command::SInter(keys) => Reply::Array(sorted(store.sinter(&keys)?)),

            Command::ZAdd(key, entries) => store.zadd(&key, entries)?.into(),
            Command::ZRem(key, members) => store.zrem(&key, &members)?.into(),
            Command::ZCard(key) => store.zcard(&key)?.into(),
            Command::ZScore(key, member) => Reply::Bulk(store.zscore(&key, &member)?.map(format_score)),
            Command::ZRange { key, start, stop, with_scores } => {
                Reply::Array(scored(store.zrange(&key, start, stop)?, with_scores))
            }
            Command::ZRevRange { key, start, stop, with_scores } => {
                Reply::Array(scored(store.zrevrange(&key, start, stop)?, with_scores))
            }
            Command::ZRank(key, member) => rank_reply(store.zrank(&key, &member)?),
            Command::ZRevRank(key, member) => rank_reply(store.zrevrank(&key, &member)?),
            Command::ZIncrBy(key, delta, member) => {
                Reply::Bulk(Some(format_score(store.zincrby(&key, delta, &member)?)))
            }

            Command::DbSize => store.dbsize().into(),
            Command::FlushDb => {
                store.flush();
                Reply::Ok
            }
            Command::Ping => Reply::Pong,
            Command::Echo(message) => Reply::Bulk(Some(message)),
            Command::Info => Reply::Array(strings(self.info())),
            // 由连接层负责断开
            Command::Quit => Reply::Ok,
            Command::Help => Reply::Bulk(Some(help_text())),
            Command::HelpCommand(name) => Reply::Bulk(Some(command_help(&name))),
        };
        Ok(reply)
    }

    /// 服务器与键空间概况，每项一行
    fn info(&self) -> Vec<String> {
        let store = &self.store_manager;
        vec![
            "# Server".to_string(),
            format!("version: {}", env!("CARGO_PKG_VERSION")),
            format!("shards: {}", store.shard_count()),
            "# Keyspace".to_string(),
            format!("keys: {}", store.dbsize()),
            format!("expires: {}", store.expires_count()),
        ]
    }
}

fn rank_reply(rank: Option<usize>) -> Reply {
    match rank {
        Some(rank) => rank.into(),
        None => Reply::Bulk(None),
    }
}

/// 集合成员无固定顺序，输出前排序
fn sorted(members: impl IntoIterator<Item = String>) -> Vec<Option<String>> {
    let mut members: Vec<String> = members.into_iter().collect();
    members.sort();
    strings(members)
}

// 获取帮助信息
fn help_text() -> String {
    let mut help = String::from("可用命令:");
    for (_, usage, description) in COMMANDS {
        help.push_str(&format!("\n  {} - {}", usage, description));
    }
    help
}

// 获取特定命令的帮助信息
fn command_help(name: &str) -> String {
    let verb = name.to_lowercase();
    match COMMANDS.iter().find(|(command, _, _)| *command == verb) {
        Some((_, usage, description)) => format!("{} - {}", usage, description),
        None => format!("Unknown command: {}", name),
    }
}
