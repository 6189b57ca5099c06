use clap::{Arg, Command};
use log::{error, info, warn};
use mkv_common::config::Settings;
use mkv_common::logger;
use mkv_common::store::StoreManager;
use mkv_server::Server;
use std::path::Path;
use std::process;
use std::sync::atomic::Ordering;

fn main() {
    // 解析命令行参数
    let matches = Command::new("mkv-server")
        .version(env!("CARGO_PKG_VERSION"))
        .about("In-memory multi-type keyspace server")
        .disable_help_flag(true)
        .arg(
            Arg::new("host")
                .short('h')
                .long("host")
                .value_name("HOST")
                .help("服务器主机地址")
                .num_args(1),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("服务器端口")
                .value_parser(clap::value_parser!(u16))
                .num_args(1),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("配置文件路径")
                .num_args(1),
        )
        .arg(
            Arg::new("help")
                .long("help")
                .help("显示帮助信息")
                .action(clap::ArgAction::Help),
        )
        .get_matches();

    // 加载配置
    let loaded = match matches.get_one::<String>("config") {
        Some(path) => Settings::from_file(Path::new(path)),
        None => Settings::new(),
    };
    let settings = match loaded {
        Ok(s) => s,
        Err(e) => {
            eprintln!("加载配置失败: {}", e);
            process::exit(1);
        }
    };

    // 初始化日志
    if let Err(e) = logger::init_logger(&settings.logging.log_file, &settings.logging.level) {
        eprintln!("初始化日志失败: {}", e);
        process::exit(1);
    }

    // 命令行参数优先于配置文件
    let host = matches
        .get_one::<String>("host")
        .cloned()
        .unwrap_or_else(|| settings.server.host.clone());
    let port = matches
        .get_one::<u16>("port")
        .copied()
        .unwrap_or(settings.server.port);

    run_server(&host, port, &settings);
}

fn run_server(host: &str, port: u16, settings: &Settings) {
    let store_manager = StoreManager::from_settings(settings);
    info!(
        "服务器配置: 主机={}, 端口={}, 分片数={}",
        host,
        port,
        store_manager.shard_count()
    );

    let sweeper = if settings.expiry.active_expiry {
        Some(store_manager.start_expiry_sweeper(
            settings.expiry.sweep_interval(),
            settings.expiry.sweep_batch,
        ))
    } else {
        warn!("后台过期清理已关闭，仅在访问时删除过期键");
        None
    };

    let server = match Server::bind(host, port, store_manager) {
        Ok(server) => server,
        Err(e) => {
            error!("服务器启动失败: {}", e);
            process::exit(1);
        }
    };

    // 捕获 Ctrl+C 信号
    let running = server.running_flag();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("接收到终止信号，正在关闭服务器...");
        running.store(false, Ordering::SeqCst);
    }) {
        error!("无法设置信号处理程序: {}", e);
        process::exit(1);
    }

    let result = server.serve();
    if let Some(sweeper) = sweeper {
        sweeper.stop();
    }
    match result {
        Ok(()) => info!("服务器正常关闭"),
        Err(e) => {
            error!("服务器运行出错: {}", e);
            process::exit(1);
        }
    }
}
