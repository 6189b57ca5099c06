use chrono::Local;
use log::{debug, error, info, warn};
use mkv_common::command::{Command, CommandHandler, Reply};
use mkv_common::store::StoreManager;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// 单行命令的最大字节数
pub const MAX_LINE_BYTES: u64 = 64 * 1024;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("无法绑定到地址 {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),
}

/// 行文本协议服务器：每行一条命令，每条命令返回带时间戳的一行回复
pub struct Server {
    listener: TcpListener,
    handler: CommandHandler,
    running: Arc<AtomicBool>,
}

impl Server {
    pub fn bind(host: &str, port: u16, store_manager: StoreManager) -> Result<Self, ServerError> {
        let addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&addr).map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
        // 非阻塞监听，便于定期检查运行标志
        listener.set_nonblocking(true)?;

        Ok(Server {
            listener,
            handler: CommandHandler::new(store_manager),
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// 置为 false 后 accept 循环退出
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub fn serve(&self) -> Result<(), ServerError> {
        info!("服务器在 {} 上启动", self.local_addr()?);

        while self.running.load(Ordering::SeqCst) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    info!("新连接: {}", addr);

                    // 为每个客户端创建一个线程
                    let handler = self.handler.clone();
                    let running = Arc::clone(&self.running);
                    thread::spawn(move || {
                        if let Err(e) = Self::handle_client(stream, addr, handler, running) {
                            error!("处理客户端 {} 时出错: {}", addr, e);
                        }
                    });
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    error!("接受连接时出错: {}", e);
                }
            }
        }

        info!("服务器已关闭");
        Ok(())
    }

    fn handle_client(
        stream: TcpStream,
        addr: SocketAddr,
        handler: CommandHandler,
        running: Arc<AtomicBool>,
    ) -> io::Result<()> {
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(Some(Duration::from_secs(30)))?;

        let mut writer = stream.try_clone()?;
        let mut reader = BufReader::new(stream);
        let mut buf: Vec<u8> = Vec::new();
        // 正在丢弃超长行的剩余部分
        let mut overflowed = false;

        while running.load(Ordering::SeqCst) {
            let budget = (MAX_LINE_BYTES + 1).saturating_sub(buf.len() as u64);
            match (&mut reader).take(budget).read_until(b'\n', &mut buf) {
                Ok(0) => {
                    info!("客户端 {} 断开连接", addr);
                    break;
                }
                Ok(_) => {
                    let terminated = buf.last() == Some(&b'\n');
                    if overflowed {
                        overflowed = !terminated;
                        buf.clear();
                        continue;
                    }
                    if !terminated && buf.len() as u64 > MAX_LINE_BYTES {
                        warn!("客户端 {} 发送的命令超过 {} 字节", addr, MAX_LINE_BYTES);
                        let reply = Reply::Error(format!("命令长度超过 {} 字节", MAX_LINE_BYTES));
                        Self::write_reply(&mut writer, &reply)?;
                        overflowed = true;
                        buf.clear();
                        continue;
                    }

                    let command = match std::str::from_utf8(&buf) {
                        Ok(text) => Ok(text.trim().to_string()),
                        Err(_) => Err(Reply::Error("命令不是有效的 UTF-8 文本".to_string())),
                    };
                    buf.clear();
                    match command {
                        Ok(text) if text.is_empty() => {}
                        Ok(text) => {
                            debug!("从 {} 接收到命令: {}", addr, text);
                            match CommandHandler::parse_command(&text) {
                                Ok(Command::Quit) => {
                                    Self::write_reply(&mut writer, &Reply::Ok)?;
                                    info!("客户端 {} 请求关闭连接", addr);
                                    break;
                                }
                                Ok(command) => {
                                    let reply = handler.execute_command(command);
                                    Self::write_reply(&mut writer, &reply)?;
                                }
                                Err(e) => {
                                    Self::write_reply(&mut writer, &Reply::Error(e.to_string()))?;
                                }
                            }
                        }
                        Err(reply) => {
                            warn!("客户端 {} 发送了非 UTF-8 数据", addr);
                            Self::write_reply(&mut writer, &reply)?;
                        }
                    }
                }
                // 超时但客户端仍然连接，已读取的半行保留在缓冲区
                Err(ref e)
                    if e.kind() == io::ErrorKind::WouldBlock
                        || e.kind() == io::ErrorKind::TimedOut =>
                {
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    fn write_reply(writer: &mut TcpStream, reply: &Reply) -> io::Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        writer.write_all(format!("[{}] {}\n", timestamp, reply).as_bytes())
    }
}
