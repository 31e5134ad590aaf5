// CSV 报告
// 固定 15 列表头，每主机一行

use crate::models::HostSnapshot;

use super::Summary;

/// 固定列顺序
const HEADERS: [&str; 15] = [
    "hostname",
    "port",
    "status",
    "cpu_usage",
    "cpu_load_1m",
    "cpu_load_5m",
    "cpu_load_15m",
    "cpu_load_relative",
    "cpu_cores",
    "memory_usage",
    "memory_percent",
    "disk_usage",
    "disk_percent",
    "containers_running",
    "containers_total",
];

/// 渲染 CSV 报告
pub fn render_csv(snapshots: &[HostSnapshot]) -> String {
    let mut out = String::new();
    out.push_str(&HEADERS.join(","));
    out.push('\n');

    for snapshot in snapshots {
        let summary = Summary::from_snapshot(snapshot);
        let row = [
            summary.hostname,
            summary.port,
            summary.status,
            summary.cpu_usage,
            summary.cpu_load_1m,
            summary.cpu_load_5m,
            summary.cpu_load_15m,
            summary.cpu_load_relative,
            summary.cpu_cores,
            summary.memory_usage,
            summary.memory_percent,
            summary.disk_usage,
            summary.disk_percent,
            summary.containers_running,
            summary.containers_total,
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CpuLoad, SnapshotBuilder};

    #[test]
    fn test_csv_header_is_fixed() {
        let rendered = render_csv(&[]);
        assert_eq!(
            rendered.lines().next().unwrap(),
            "hostname,port,status,cpu_usage,cpu_load_1m,cpu_load_5m,cpu_load_15m,\
             cpu_load_relative,cpu_cores,memory_usage,memory_percent,disk_usage,\
             disk_percent,containers_running,containers_total"
        );
    }

    #[test]
    fn test_csv_row_per_host() {
        let mut builder = SnapshotBuilder::new("host1", 22);
        builder.resources.cpu_load = Some(CpuLoad {
            load_1m: 0.52,
            load_5m: 0.58,
            load_15m: 0.59,
        });
        let snapshots = vec![
            builder.finish(),
            HostSnapshot::unavailable("host2", 2222, "Authentication failed"),
        ];

        let rendered = render_csv(&snapshots);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);

        assert!(lines[1].starts_with("host1,22,available,"));
        assert!(lines[1].contains(",0.52,0.58,0.59,"));
        assert!(lines[2].starts_with("host2,2222,unavailable,N/A,"));

        // 每行恰好 15 列
        for line in &lines[1..] {
            assert_eq!(line.split(',').count(), 15);
        }
    }
}
