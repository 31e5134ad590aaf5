// 命令执行抽象
// 采集器只通过该 trait 执行远程命令，便于测试时替换为假传输

use async_trait::async_trait;

use super::error::SshError;
use super::session::{CommandOutput, SshSession};

/// 远程命令执行器
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// 执行命令并返回输出
    async fn run(&self, command: &str) -> Result<CommandOutput, SshError>;
}

#[async_trait]
impl CommandRunner for SshSession {
    async fn run(&self, command: &str) -> Result<CommandOutput, SshError> {
        SshSession::run(self, command).await
    }
}
