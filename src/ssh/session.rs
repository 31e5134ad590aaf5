// SSH 会话管理
// 连接成功后的会话对象，提供命令执行能力

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use russh::client::Handle;
use russh::client::Msg;
use russh::ChannelMsg;
use tokio::sync::Mutex;
use tokio::time::timeout;

use super::error::SshError;
use super::handler::SshClientHandler;

// 使用 russh::client::Msg 作为消息类型
type RusshChannel = russh::Channel<Msg>;

/// SSH 会话（连接成功后）
/// 由单个采集任务独占，不跨主机共享
pub struct SshSession {
    /// 共享的 russh Handle（Arc 包装）
    handle: Arc<Handle<SshClientHandler>>,
    /// 服务器主机名
    host: String,
    /// 用户名
    username: String,
    /// 单条命令超时
    command_timeout: Duration,
    /// 连接状态
    is_connected: AtomicBool,
}

impl SshSession {
    /// 创建新的会话
    pub fn new(
        handle: Arc<Handle<SshClientHandler>>,
        host: String,
        username: String,
        command_timeout: Duration,
    ) -> Self {
        Self {
            handle,
            host,
            username,
            command_timeout,
            is_connected: AtomicBool::new(true),
        }
    }

    /// 获取主机名
    pub fn host(&self) -> &str {
        &self.host
    }

    /// 获取用户名
    pub fn username(&self) -> &str {
        &self.username
    }

    /// 检查会话是否活跃
    pub fn is_alive(&self) -> bool {
        self.is_connected.load(Ordering::Relaxed)
    }

    /// 打开执行通道
    pub async fn open_exec(&self) -> Result<ExecChannel, SshError> {
        if !self.is_alive() {
            return Err(SshError::Disconnected(
                "Session is disconnected".to_string(),
            ));
        }

        let channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(SshError::from)?;

        Ok(ExecChannel::new(channel))
    }

    /// 执行单条命令并获取输出
    /// 命令超时覆盖通道打开与命令执行的全过程
    pub async fn run(&self, command: &str) -> Result<CommandOutput, SshError> {
        with_command_timeout(self.command_timeout, async {
            let exec = self.open_exec().await?;
            exec.exec(command).await
        })
        .await
    }

    /// 关闭会话（幂等，未连接时为空操作）
    /// Handle 在 drop 时释放底层连接
    pub async fn close(&self) -> Result<(), SshError> {
        self.is_connected.store(false, Ordering::Relaxed);
        Ok(())
    }
}

/// 给单条命令的完整生命周期加超时
async fn with_command_timeout<T>(
    limit: Duration,
    fut: impl std::future::Future<Output = Result<T, SshError>>,
) -> Result<T, SshError> {
    timeout(limit, fut)
        .await
        .map_err(|_| SshError::CommandTimeout(limit.as_secs()))?
}

/// 执行通道（执行单个命令）
pub struct ExecChannel {
    channel: Mutex<RusshChannel>,
}

impl ExecChannel {
    fn new(channel: RusshChannel) -> Self {
        Self {
            channel: Mutex::new(channel),
        }
    }

    /// 执行命令并获取输出
    pub async fn exec(&self, command: &str) -> Result<CommandOutput, SshError> {
        let mut channel = self.channel.lock().await;

        channel
            .exec(true, command)
            .await
            .map_err(|e| SshError::Channel(e.to_string()))?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut exit_code = None;

        loop {
            match channel.wait().await {
                Some(channel_msg) => match channel_msg {
                    ChannelMsg::Data { data } => {
                        stdout.extend_from_slice(&data);
                    }
                    ChannelMsg::ExtendedData { data, ext } => {
                        if ext == 1 {
                            // stderr
                            stderr.extend_from_slice(&data);
                        }
                    }
                    ChannelMsg::ExitStatus { exit_status } => {
                        exit_code = Some(exit_status);
                    }
                    ChannelMsg::Eof | ChannelMsg::Close => {
                        break;
                    }
                    _ => {}
                },
                None => break,
            }
        }

        Ok(CommandOutput {
            stdout,
            stderr,
            exit_code: exit_code.unwrap_or(0),
        })
    }
}

/// 命令输出
#[derive(Debug)]
pub struct CommandOutput {
    /// 标准输出
    pub stdout: Vec<u8>,
    /// 标准错误
    pub stderr: Vec<u8>,
    /// 退出码
    pub exit_code: u32,
}

impl CommandOutput {
    /// 获取标准输出字符串（去除首尾空白）
    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).trim().to_string()
    }

    /// 获取标准错误字符串（去除首尾空白）
    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }

    /// 检查命令是否成功
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// 校验退出码并提取标准输出
    /// 非零退出码映射为结构化错误，区分有无 stderr 输出
    pub fn checked_stdout(self) -> Result<String, SshError> {
        if self.exit_code != 0 {
            let stderr = self.stderr_string();
            if stderr.is_empty() {
                return Err(SshError::CommandExit {
                    code: self.exit_code,
                });
            }
            return Err(SshError::CommandFailed {
                code: self.exit_code,
                stderr,
            });
        }
        Ok(self.stdout_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(stdout: &str, stderr: &str, exit_code: u32) -> CommandOutput {
        CommandOutput {
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
            exit_code,
        }
    }

    #[test]
    fn test_checked_stdout_success() {
        let out = output("hello\n", "", 0);
        assert_eq!(out.checked_stdout().unwrap(), "hello");
    }

    #[test]
    fn test_checked_stdout_failure_with_stderr() {
        let out = output("", "permission denied\n", 1);
        match out.checked_stdout() {
            Err(SshError::CommandFailed { code, stderr }) => {
                assert_eq!(code, 1);
                assert_eq!(stderr, "permission denied");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_checked_stdout_failure_without_stderr() {
        let out = output("", "", 127);
        match out.checked_stdout() {
            Err(SshError::CommandExit { code }) => assert_eq!(code, 127),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_command_timeout_covers_channel_setup() {
        // 命令开始执行前的阶段（通道打开）卡住时同样要触发超时
        let result = with_command_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(output("never", "", 0))
        })
        .await;

        assert!(matches!(result, Err(SshError::CommandTimeout(_))));
    }
}
