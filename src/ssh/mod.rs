// SSH 连接模块
//
// 模块结构:
// - config: 连接配置 (SshConfig, AuthMethod)
// - error: 错误类型 (SshError)
// - handler: russh Handler 实现
// - client: SSH 客户端核心
// - session: SSH 会话管理 (SshSession, ExecChannel, CommandOutput)
// - runner: 命令执行抽象 (CommandRunner)

pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod runner;
pub mod session;

// 公开导出
pub use client::SshClient;
pub use config::{AuthMethod, SshConfig};
pub use error::SshError;
pub use runner::CommandRunner;
pub use session::{CommandOutput, SshSession};
