// 指标采集器
// 在一个会话上按固定顺序执行探测命令，组装主机快照
//
// 每个探测的失败都被隔离：对应字段留空，继续后续探测。
// 顺序上只有一个依赖：核心数必须先于相对负载。

pub mod docker;
pub mod probes;

use tracing::debug;

use crate::models::{HostSnapshot, ResourceSection, SnapshotBuilder, SystemSection};
use crate::ssh::CommandRunner;

// ============================================================================
// 探测命令
// ============================================================================

const CMD_HOSTNAME: &str = "hostname";
const CMD_OS: &str = r#"cat /etc/os-release | grep PRETTY_NAME | cut -d '"' -f 2"#;
const CMD_KERNEL: &str = "uname -r";
const CMD_UPTIME: &str = "uptime -p";
const CMD_LOADAVG: &str = "cat /proc/loadavg";
const CMD_CPU_USAGE: &str = "top -bn1 | grep 'Cpu(s)'";
const CMD_CORES: &str = "nproc";
const CMD_MEMORY: &str = "free -b";
const CMD_DISKS: &str = "df -B1 -x tmpfs -x devtmpfs -x squashfs -x overlay";

/// 执行命令并提取非空标准输出
/// 命令失败或输出为空时返回 None（由调用方决定字段缺省）
pub(crate) async fn run_ok(runner: &dyn CommandRunner, command: &str) -> Option<String> {
    match runner.run(command).await {
        Ok(output) => match output.checked_stdout() {
            Ok(stdout) if !stdout.is_empty() => Some(stdout),
            Ok(_) => None,
            Err(e) => {
                debug!("[Collector] Command '{}' failed: {}", command, e);
                None
            }
        },
        Err(e) => {
            debug!("[Collector] Command '{}' failed: {}", command, e);
            None
        }
    }
}

/// 采集一台主机的完整快照
/// 会话已建立；所有探测失败也会返回（字段为空的）可用快照
pub async fn collect(runner: &dyn CommandRunner, hostname: &str, port: u16) -> HostSnapshot {
    let mut builder = SnapshotBuilder::new(hostname, port);

    collect_system(runner, &mut builder.system).await;
    collect_resources(runner, hostname, &mut builder.resources).await;
    docker::collect_docker(runner, hostname, &mut builder.docker).await;

    builder.finish()
}

/// 采集系统基础信息
async fn collect_system(runner: &dyn CommandRunner, system: &mut SystemSection) {
    system.hostname = run_ok(runner, CMD_HOSTNAME).await;
    system.os = run_ok(runner, CMD_OS).await;
    system.kernel = run_ok(runner, CMD_KERNEL).await;
    system.uptime = run_ok(runner, CMD_UPTIME).await;
}

/// 采集资源信息
async fn collect_resources(runner: &dyn CommandRunner, host: &str, resources: &mut ResourceSection) {
    if let Some(output) = run_ok(runner, CMD_LOADAVG).await {
        match probes::parse_load_avg(&output) {
            Ok(load) => resources.cpu_load = Some(load),
            Err(e) => debug!("[Collector] {}: load average parse failed: {}", host, e),
        }
    }

    if let Some(output) = run_ok(runner, CMD_CPU_USAGE).await {
        match probes::parse_cpu_usage(&output) {
            Ok(usage) => resources.cpu_usage_current = Some(usage),
            Err(e) => debug!("[Collector] {}: cpu usage parse failed: {}", host, e),
        }
    }

    if let Some(output) = run_ok(runner, CMD_CORES).await {
        match probes::parse_core_count(&output) {
            Ok(cores) => resources.cpu_cores = Some(cores),
            Err(e) => debug!("[Collector] {}: core count parse failed: {}", host, e),
        }
    }

    // 相对负载：核心数与负载均值都存在时才可计算
    if let (Some(load), Some(cores)) = (resources.cpu_load.as_ref(), resources.cpu_cores) {
        resources.cpu_load_relative = probes::relative_load(load, cores);
    }

    if let Some(output) = run_ok(runner, CMD_MEMORY).await {
        match probes::parse_memory(&output) {
            Ok(memory) => resources.memory = Some(memory),
            Err(e) => debug!("[Collector] {}: memory parse failed: {}", host, e),
        }
    }

    if let Some(output) = run_ok(runner, CMD_DISKS).await {
        resources.disks = probes::parse_disks(&output);
    }
}
