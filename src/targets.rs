// 巡检目标解析
// 从主机清单文件读取 [user@]host[:port] 形式的目标

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use thiserror::Error;
use tracing::debug;

use crate::ssh::{AuthMethod, SshConfig};

/// 目标解析错误
#[derive(Debug, Error)]
pub enum TargetError {
    /// 主机名为空
    #[error("Empty hostname in target '{0}'")]
    EmptyHost(String),

    /// 端口号非法
    #[error("Invalid port in target '{0}'")]
    InvalidPort(String),
}

/// 一个巡检目标
/// 从单个字符串解析一次，构造后不可变
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostTarget {
    /// 用户名（可选）
    pub username: Option<String>,
    /// 主机名或 IP
    pub hostname: String,
    /// 端口（默认 22）
    pub port: u16,
    /// 私钥文件路径（可选，已做 ~ 展开）
    pub key_file: Option<PathBuf>,
    /// 密码（可选，整次运行共用）
    pub password: Option<String>,
}

impl HostTarget {
    /// 解析 [user@]host[:port] 形式的目标
    pub fn parse(spec: &str) -> Result<Self, TargetError> {
        let (username, host_part) = match spec.split_once('@') {
            Some((user, rest)) => (Some(user.to_string()), rest),
            None => (None, spec),
        };

        let (hostname, port) = match host_part.split_once(':') {
            Some((host, port_str)) => {
                let port: u16 = port_str
                    .parse()
                    .ok()
                    .filter(|p| *p > 0)
                    .ok_or_else(|| TargetError::InvalidPort(spec.to_string()))?;
                (host.to_string(), port)
            }
            None => (host_part.to_string(), 22),
        };

        if hostname.is_empty() {
            return Err(TargetError::EmptyHost(spec.to_string()));
        }

        Ok(Self {
            username,
            hostname,
            port,
            key_file: None,
            password: None,
        })
    }

    /// 附加认证信息（密钥路径做 ~ 展开）
    pub fn with_auth(mut self, key_file: Option<&Path>, password: Option<&str>) -> Self {
        self.key_file = key_file.map(expand_tilde);
        self.password = password.map(|p| p.to_string());
        self
    }

    /// 构建 SSH 连接配置
    /// 认证优先级：显式密码 > 密钥文件（路径存在时）> 传输层默认行为
    pub fn ssh_config(&self) -> SshConfig {
        let auth = if let Some(password) = &self.password {
            AuthMethod::Password(password.clone())
        } else {
            match &self.key_file {
                Some(path) if path.exists() => AuthMethod::PublicKey {
                    key_path: path.clone(),
                    passphrase: None,
                },
                _ => AuthMethod::Default,
            }
        };

        SshConfig {
            host: self.hostname.clone(),
            port: self.port,
            // 未指定用户时沿用当前用户名
            username: self
                .username
                .clone()
                .unwrap_or_else(|| std::env::var("USER").unwrap_or_else(|_| "root".to_string())),
            auth,
            ..SshConfig::default()
        }
    }

    /// 目标的显示形式
    pub fn label(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}

/// 展开路径中的 ~ 前缀
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

/// 读取主机清单文件
/// 空行和 # 开头的行忽略；文件缺失或无有效目标是致命的启动错误
pub async fn load_targets(
    path: &Path,
    key_file: Option<&Path>,
    password: Option<&str>,
) -> anyhow::Result<Vec<HostTarget>> {
    let content = tokio::fs::read_to_string(path).await.with_context(|| {
        format!(
            "File {} not found. Create a file in the format: user@hostname or hostname (one per line)",
            path.display()
        )
    })?;

    let mut targets = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let target = HostTarget::parse(line)
            .with_context(|| format!("Invalid target line: '{}'", line))?
            .with_auth(key_file, password);
        debug!("[Targets] Parsed target {}", target.label());
        targets.push(target);
    }

    if targets.is_empty() {
        bail!("No targets found in {}", path.display());
    }

    Ok(targets)
}
