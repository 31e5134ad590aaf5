// Docker 子采集器
// 先列表后逐个描述：容器列表 -> 每容器 stats -> 每容器 inspect

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{
    ContainerLimits, ContainerRecord, ContainerStats, DockerDaemonInfo, DockerSection,
};
use crate::ssh::CommandRunner;

use super::run_ok;

/// 采集 Docker 信息
/// Docker 未安装时短路返回（installed=false），不算失败
pub async fn collect_docker(runner: &dyn CommandRunner, host: &str, docker: &mut DockerSection) {
    // 安装检测
    if run_ok(runner, "command -v docker").await.is_none() {
        docker.installed = false;
        return;
    }
    docker.installed = true;

    // 版本
    docker.version = run_ok(runner, "docker --version").await;

    // 守护进程概要
    if let Some(output) = run_ok(runner, "docker info --format '{{json .}}'").await {
        docker.info = Some(parse_daemon_info(&output).unwrap_or_else(|| {
            warn!(
                "[Docker] Failed to parse docker info JSON on {}, using defaults",
                host
            );
            DockerDaemonInfo::unknown()
        }));
    }

    // 运行中容器：逐个补充 stats 与 limits
    if let Some(output) = run_ok(runner, "docker ps --format '{{json .}}'").await {
        let mut running: Vec<ContainerRecord> = parse_ndjson(&output);
        for container in &mut running {
            enrich_container(runner, container).await;
        }
        docker.containers.running = running;
    }

    // 全部容器
    if let Some(output) = run_ok(runner, "docker ps -a --format '{{json .}}'").await {
        docker.containers.all = parse_ndjson(&output);
    }

    // 镜像列表（不截断，文本渲染时截断）
    if let Some(output) = run_ok(runner, "docker images --format '{{json .}}'").await {
        docker.images = parse_ndjson(&output);
    }
}

/// 为单个运行中容器补充实时占用与资源限制
/// 每个探测失败只留下 None，不中断容器循环
async fn enrich_container(runner: &dyn CommandRunner, container: &mut ContainerRecord) {
    let name = shell_quote(&container.name);

    let stats_cmd = format!("docker stats {} --no-stream --format '{{{{json .}}}}'", name);
    if let Some(output) = run_ok(runner, &stats_cmd).await {
        container.stats = serde_json::from_str::<ContainerStats>(&output)
            .map_err(|e| debug!("[Docker] Failed to parse stats for {}: {}", container.name, e))
            .ok();
    }

    let inspect_cmd = format!("docker inspect {} --format '{{{{json .HostConfig}}}}'", name);
    if let Some(output) = run_ok(runner, &inspect_cmd).await {
        container.limits = parse_limits(&output);
        if container.limits.is_none() {
            debug!("[Docker] Failed to parse HostConfig for {}", container.name);
        }
    }
}

/// 解析 docker info 的 JSON 输出
fn parse_daemon_info(output: &str) -> Option<DockerDaemonInfo> {
    let value: Value = serde_json::from_str(output).ok()?;
    Some(DockerDaemonInfo {
        containers_running: value["ContainersRunning"].as_u64().unwrap_or(0),
        containers_total: value["Containers"].as_u64().unwrap_or(0),
        images: value["Images"].as_u64().unwrap_or(0),
        storage_driver: value["Driver"].as_str().unwrap_or("").to_string(),
        cgroup_driver: value["CgroupDriver"].as_str().unwrap_or("").to_string(),
    })
}

/// 解析 docker inspect 的 HostConfig JSON
fn parse_limits(output: &str) -> Option<ContainerLimits> {
    let value: Value = serde_json::from_str(output).ok()?;
    value.as_object()?;
    Some(ContainerLimits {
        cpu: value["CpuShares"].as_i64().unwrap_or(0),
        memory: value["Memory"].as_i64().unwrap_or(0),
    })
}

/// 按行解析换行分隔的 JSON 对象
/// 无法解析的行跳过，不影响其余记录
fn parse_ndjson<T: DeserializeOwned>(output: &str) -> Vec<T> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            serde_json::from_str(line)
                .map_err(|e| debug!("[Docker] Skipping unparseable line: {}", e))
                .ok()
        })
        .collect()
}

/// 单引号 Shell 转义
/// 容器名来自远端，拼入命令前必须转义
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote_plain_name() {
        assert_eq!(shell_quote("web-1"), "'web-1'");
    }

    #[test]
    fn test_shell_quote_hostile_name() {
        assert_eq!(
            shell_quote("a'; rm -rf / #"),
            r"'a'\''; rm -rf / #'"
        );
    }

    #[test]
    fn test_parse_ndjson_skips_bad_lines() {
        let output = "\
{\"Names\":\"web\",\"Image\":\"nginx\",\"Status\":\"Up\"}
not json
{\"Names\":\"db\",\"Image\":\"postgres\",\"Status\":\"Up\"}";
        let records: Vec<ContainerRecord> = parse_ndjson(output);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "web");
        assert_eq!(records[1].name, "db");
    }

    #[test]
    fn test_parse_daemon_info() {
        let json = r#"{"ContainersRunning":3,"Containers":7,"Images":12,"Driver":"overlay2","CgroupDriver":"systemd"}"#;
        let info = parse_daemon_info(json).unwrap();
        assert_eq!(info.containers_running, 3);
        assert_eq!(info.containers_total, 7);
        assert_eq!(info.images, 12);
        assert_eq!(info.storage_driver, "overlay2");
        assert_eq!(info.cgroup_driver, "systemd");
    }

    #[test]
    fn test_parse_daemon_info_bad_json() {
        assert!(parse_daemon_info("not json at all").is_none());
    }

    #[test]
    fn test_parse_limits() {
        let json = r#"{"CpuShares":512,"Memory":1073741824,"NanoCpus":0}"#;
        let limits = parse_limits(json).unwrap();
        assert_eq!(limits.cpu, 512);
        assert_eq!(limits.memory, 1073741824);
    }

    #[test]
    fn test_parse_limits_non_object() {
        assert!(parse_limits("null").is_none());
        assert!(parse_limits("{{").is_none());
    }
}
