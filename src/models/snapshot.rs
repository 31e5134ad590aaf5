// 巡检结果数据模型
// 每个采集任务写入、每个渲染器读取的类型化记录

use serde::{Deserialize, Serialize};

// ============================================================================
// 系统信息
// ============================================================================

/// 系统基础信息
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemSection {
    /// 远端上报的主机名（可能与连接目标不同）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// 操作系统名称（PRETTY_NAME）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    /// 内核版本
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel: Option<String>,
    /// 运行时间
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<String>,
}

// ============================================================================
// 资源信息
// ============================================================================

/// 负载均值（1/5/15 分钟）
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CpuLoad {
    pub load_1m: f64,
    pub load_5m: f64,
    pub load_15m: f64,
}

/// 相对负载（负载均值 / 核心数，百分比）
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CpuLoadRelative {
    pub load_1m_percent: f64,
    pub load_5m_percent: f64,
    pub load_15m_percent: f64,
}

/// 内存用量（字节）
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub usage_percent: f64,
}

/// 单个挂载点的磁盘用量（字节）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiskEntry {
    /// 挂载点
    pub mount_point: String,
    /// 设备名
    pub device: String,
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub usage_percent: f64,
}

/// 资源信息
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceSection {
    /// 瞬时 CPU 使用率（user + system，百分比）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_usage_current: Option<f64>,
    /// 负载均值
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_load: Option<CpuLoad>,
    /// 相对负载（需要核心数）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_load_relative: Option<CpuLoadRelative>,
    /// CPU 核心数
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_cores: Option<u32>,
    /// 内存用量
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryUsage>,
    /// 各挂载点磁盘用量
    pub disks: Vec<DiskEntry>,
}

impl ResourceSection {
    /// 根分区磁盘用量（摘要行使用）
    pub fn root_disk(&self) -> Option<&DiskEntry> {
        self.disks
            .iter()
            .find(|d| d.mount_point == "/")
            .or_else(|| self.disks.first())
    }
}

// ============================================================================
// Docker 信息
// ============================================================================

/// Docker 守护进程概要
/// 来自 docker info 的 JSON 输出；解析失败时代入零值/unknown 默认
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DockerDaemonInfo {
    pub containers_running: u64,
    pub containers_total: u64,
    pub images: u64,
    pub storage_driver: String,
    pub cgroup_driver: String,
}

impl DockerDaemonInfo {
    /// docker info 解析失败时的兜底默认值
    pub fn unknown() -> Self {
        Self {
            containers_running: 0,
            containers_total: 0,
            images: 0,
            storage_driver: "unknown".to_string(),
            cgroup_driver: "unknown".to_string(),
        }
    }
}

/// 容器实时资源占用
/// 字段名保持 docker stats 的原始键
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerStats {
    #[serde(rename = "CPUPerc", default)]
    pub cpu_perc: String,
    #[serde(rename = "MemUsage", default)]
    pub mem_usage: String,
}

/// 容器资源限制
/// 来自 docker inspect 的 HostConfig
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ContainerLimits {
    /// CpuShares
    pub cpu: i64,
    /// 内存上限（字节，0 表示无限制）
    pub memory: i64,
}

/// 容器记录
/// 字段名保持 docker ps 的原始键
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerRecord {
    #[serde(rename = "Names", default)]
    pub name: String,
    #[serde(rename = "Image", default)]
    pub image: String,
    #[serde(rename = "Status", default)]
    pub status: String,
    /// 实时占用（仅运行中容器，stats 探测失败时为 None）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ContainerStats>,
    /// 资源限制（仅运行中容器，inspect 探测失败时为 None）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<ContainerLimits>,
}

/// 镜像记录
/// 字段名保持 docker images 的原始键
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(rename = "Repository", default)]
    pub repository: String,
    #[serde(rename = "Tag", default)]
    pub tag: String,
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(rename = "Size", default)]
    pub size: String,
}

/// 容器列表（运行中 / 全部）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerLists {
    pub running: Vec<ContainerRecord>,
    pub all: Vec<ContainerRecord>,
}

/// Docker 信息
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DockerSection {
    /// 是否安装了 Docker
    pub installed: bool,
    /// 版本字符串
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// 守护进程概要
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<DockerDaemonInfo>,
    /// 容器列表
    pub containers: ContainerLists,
    /// 镜像列表（采集不截断，文本渲染时截断到前 10 个）
    pub images: Vec<ImageRecord>,
}

// ============================================================================
// 主机快照
// ============================================================================

/// 一台主机的完整巡检快照
/// 采集结束后冻结，不可变
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostSnapshot {
    /// 连接目标主机名
    pub hostname: String,
    /// 连接目标端口
    pub port: u16,
    /// 是否可达
    pub available: bool,
    /// 不可达时的错误描述
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 系统信息
    pub system_info: SystemSection,
    /// 资源信息
    pub resources: ResourceSection,
    /// Docker 信息
    pub docker: DockerSection,
}

/// 快照暂存区
/// 采集过程中逐步写入，结束时冻结为 HostSnapshot
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    pub hostname: String,
    pub port: u16,
    pub system: SystemSection,
    pub resources: ResourceSection,
    pub docker: DockerSection,
}

impl SnapshotBuilder {
    /// 为指定目标创建空的暂存区
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            ..Self::default()
        }
    }

    /// 冻结为可用主机的快照
    pub fn finish(self) -> HostSnapshot {
        HostSnapshot {
            hostname: self.hostname,
            port: self.port,
            available: true,
            error: None,
            system_info: self.system,
            resources: self.resources,
            docker: self.docker,
        }
    }
}

impl HostSnapshot {
    /// 连接失败主机的快照：所有信息区为空，error 非空
    pub fn unavailable(hostname: impl Into<String>, port: u16, error: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            available: false,
            error: Some(error.into()),
            system_info: SystemSection::default(),
            resources: ResourceSection::default(),
            docker: DockerSection::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_snapshot_is_empty() {
        let snapshot = HostSnapshot::unavailable("host1", 22, "Connection timeout");
        assert!(!snapshot.available);
        assert_eq!(snapshot.error.as_deref(), Some("Connection timeout"));
        assert!(snapshot.system_info.hostname.is_none());
        assert!(snapshot.resources.memory.is_none());
        assert!(snapshot.resources.disks.is_empty());
        assert!(!snapshot.docker.installed);
        assert!(snapshot.docker.containers.running.is_empty());
    }

    #[test]
    fn test_builder_freezes_available_snapshot() {
        let mut builder = SnapshotBuilder::new("host1", 2222);
        builder.system.hostname = Some("remote-name".to_string());
        builder.resources.cpu_cores = Some(4);
        let snapshot = builder.finish();
        assert!(snapshot.available);
        assert!(snapshot.error.is_none());
        assert_eq!(snapshot.port, 2222);
        assert_eq!(snapshot.system_info.hostname.as_deref(), Some("remote-name"));
    }

    #[test]
    fn test_root_disk_prefers_root_mount() {
        let mut resources = ResourceSection::default();
        resources.disks.push(DiskEntry {
            mount_point: "/data".to_string(),
            ..DiskEntry::default()
        });
        resources.disks.push(DiskEntry {
            mount_point: "/".to_string(),
            total: 100,
            ..DiskEntry::default()
        });
        assert_eq!(resources.root_disk().unwrap().total, 100);
    }

    #[test]
    fn test_container_record_parses_docker_ps_keys() {
        let json = r#"{"Names":"web","Image":"nginx:latest","Status":"Up 2 hours","ID":"abc"}"#;
        let record: ContainerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "web");
        assert_eq!(record.image, "nginx:latest");
        assert!(record.stats.is_none());
    }
}
