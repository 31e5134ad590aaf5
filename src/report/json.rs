// JSON 报告
// {timestamp: ISO-8601, servers: [每主机完整信息]}

use anyhow::Context;
use chrono::Local;
use serde_json::json;

use crate::models::HostSnapshot;

/// 渲染 JSON 报告
pub fn render_json(snapshots: &[HostSnapshot]) -> anyhow::Result<String> {
    let report = json!({
        "timestamp": Local::now().to_rfc3339(),
        "servers": snapshots,
    });

    serde_json::to_string_pretty(&report).context("Failed to serialize report to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SnapshotBuilder;

    #[test]
    fn test_render_json_shape() {
        let snapshots = vec![
            SnapshotBuilder::new("host1", 22).finish(),
            HostSnapshot::unavailable("host2", 2222, "Connection timeout"),
        ];

        let rendered = render_json(&snapshots).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert!(value["timestamp"].is_string());
        let servers = value["servers"].as_array().unwrap();
        assert_eq!(servers.len(), 2);
        assert_eq!(servers[0]["hostname"], "host1");
        assert_eq!(servers[0]["available"], true);
        assert_eq!(servers[1]["available"], false);
        assert_eq!(servers[1]["error"], "Connection timeout");
    }

    #[test]
    fn test_timestamp_is_iso8601() {
        let rendered = render_json(&[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let timestamp = value["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }
}
