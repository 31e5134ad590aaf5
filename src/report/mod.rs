// 报告渲染模块
// 纯函数：对已采集的 FleetReport 生成文本 / JSON / CSV 输出

pub mod csv;
pub mod json;
pub mod text;

use clap::ValueEnum;

use crate::models::HostSnapshot;

/// 输出格式
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    /// 默认输出文件的扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// 按指定格式渲染报告
pub fn render(snapshots: &[HostSnapshot], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render_text(snapshots)),
        OutputFormat::Json => json::render_json(snapshots),
        OutputFormat::Csv => Ok(csv::render_csv(snapshots)),
    }
}

/// 字节数转人类可读格式
/// 取 {B,KB,MB,GB,TB,PB} 中缩放值 < 1024 的最大单位，保留两位小数；0 -> "0B"
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0B".to_string();
    }
    if bytes < 1024 {
        return format!("{}B", bytes);
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{}{}", (size * 100.0).round() / 100.0, UNITS[unit])
}

/// 摘要行：文本表格与 CSV 共用的每主机一行
pub(crate) struct Summary {
    pub hostname: String,
    pub port: String,
    pub status: String,
    pub error: Option<String>,
    pub cpu_usage: String,
    pub cpu_load_1m: String,
    pub cpu_load_5m: String,
    pub cpu_load_15m: String,
    pub cpu_load_relative: String,
    pub cpu_cores: String,
    pub memory_usage: String,
    pub memory_percent: String,
    pub disk_usage: String,
    pub disk_percent: String,
    pub containers_running: String,
    pub containers_total: String,
}

impl Summary {
    pub fn from_snapshot(snapshot: &HostSnapshot) -> Self {
        if !snapshot.available {
            return Self {
                hostname: snapshot.hostname.clone(),
                port: snapshot.port.to_string(),
                status: "unavailable".to_string(),
                error: snapshot.error.clone(),
                cpu_usage: "N/A".to_string(),
                cpu_load_1m: "N/A".to_string(),
                cpu_load_5m: "N/A".to_string(),
                cpu_load_15m: "N/A".to_string(),
                cpu_load_relative: "N/A".to_string(),
                cpu_cores: "N/A".to_string(),
                memory_usage: "N/A".to_string(),
                memory_percent: "N/A".to_string(),
                disk_usage: "N/A".to_string(),
                disk_percent: "N/A".to_string(),
                containers_running: "N/A".to_string(),
                containers_total: "N/A".to_string(),
            };
        }

        let resources = &snapshot.resources;

        let memory = resources.memory.unwrap_or_default();
        let memory_usage = format!(
            "{}/{}",
            format_bytes(memory.used),
            format_bytes(memory.total)
        );

        let disk = resources.root_disk().cloned().unwrap_or_default();
        let disk_usage = format!("{}/{}", format_bytes(disk.used), format_bytes(disk.total));

        let docker_info = snapshot.docker.info.clone().unwrap_or_default();

        let load = |v: Option<f64>| match v {
            Some(v) => v.to_string(),
            None => "N/A".to_string(),
        };

        Self {
            hostname: snapshot.hostname.clone(),
            port: snapshot.port.to_string(),
            status: "available".to_string(),
            error: None,
            cpu_usage: format!("{:.1}%", resources.cpu_usage_current.unwrap_or(0.0)),
            cpu_load_1m: load(resources.cpu_load.map(|l| l.load_1m)),
            cpu_load_5m: load(resources.cpu_load.map(|l| l.load_5m)),
            cpu_load_15m: load(resources.cpu_load.map(|l| l.load_15m)),
            cpu_load_relative: format!(
                "{:.2}%",
                resources
                    .cpu_load_relative
                    .map(|l| l.load_5m_percent)
                    .unwrap_or(0.0)
            ),
            cpu_cores: resources
                .cpu_cores
                .map(|c| c.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            memory_usage,
            memory_percent: format!("{:.2}%", memory.usage_percent),
            disk_usage,
            disk_percent: format!("{:.2}%", disk.usage_percent),
            containers_running: docker_info.containers_running.to_string(),
            containers_total: docker_info.containers_total.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MemoryUsage, SnapshotBuilder};

    #[test]
    fn test_format_bytes_zero() {
        assert_eq!(format_bytes(0), "0B");
    }

    #[test]
    fn test_format_bytes_below_one_kb() {
        assert_eq!(format_bytes(512), "512B");
        assert_eq!(format_bytes(1023), "1023B");
    }

    #[test]
    fn test_format_bytes_unit_scaling() {
        assert_eq!(format_bytes(1536), "1.5KB");
        assert_eq!(format_bytes(1048576), "1MB");
        assert_eq!(format_bytes(4000000000), "3.73GB");
        assert_eq!(format_bytes(8000000000), "7.45GB");
    }

    #[test]
    fn test_format_bytes_largest_unit_below_1024() {
        // 单位按未舍入的缩放值选取，数值部分 < 1024
        for bytes in [1024u64, 1536, 10_485_760, 999_999_999_999_999] {
            let formatted = format_bytes(bytes);
            let digits: String = formatted
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            assert!(digits.parse::<f64>().unwrap() < 1024.0, "{}", formatted);
        }
    }

    #[test]
    fn test_format_bytes_rounding_at_unit_boundary() {
        // 1048575 缩放为 1023.999KB，两位小数舍入后显示 1024KB，单位不进位
        assert_eq!(format_bytes(1048575), "1024KB");
    }

    #[test]
    fn test_summary_memory_render_format() {
        let mut builder = SnapshotBuilder::new("10.0.0.5", 2222);
        builder.resources.memory = Some(MemoryUsage {
            total: 8000000000,
            used: 4000000000,
            free: 4000000000,
            usage_percent: 50.0,
        });
        let summary = Summary::from_snapshot(&builder.finish());

        assert_eq!(summary.memory_usage, "3.73GB/7.45GB");
        assert_eq!(summary.memory_percent, "50.00%");
    }

    #[test]
    fn test_summary_unavailable_host() {
        let snapshot = crate::models::HostSnapshot::unavailable("h", 22, "Connection timeout");
        let summary = Summary::from_snapshot(&snapshot);
        assert_eq!(summary.status, "unavailable");
        assert_eq!(summary.error.as_deref(), Some("Connection timeout"));
        assert_eq!(summary.cpu_usage, "N/A");
    }
}
