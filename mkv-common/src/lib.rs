pub mod store;
pub mod config;
pub mod command;
pub mod logger;

// 重新导出常用类型，方便服务端使用
pub use store::{Store, StoreError, StoreManager};
pub use command::{Command, CommandError, CommandHandler, Reply};
pub use config::Settings;
