// 文本报告
// 摘要表格 + 每主机详情段 + Docker 容器/镜像子表

use std::fmt::Write;

use crate::models::HostSnapshot;

use super::{format_bytes, Summary};

/// 文本渲染时镜像列表的最大展示条数
const MAX_IMAGES_SHOWN: usize = 10;

/// 渲染完整文本报告
pub fn render_text(snapshots: &[HostSnapshot]) -> String {
    let mut out = String::new();

    out.push_str("SERVER SUMMARY\n");
    out.push_str(&"=".repeat(80));
    out.push('\n');
    out.push_str(&render_summary_table(snapshots));
    out.push('\n');

    out.push_str("\nDETAILED SERVER INFORMATION\n");
    out.push_str(&"=".repeat(80));
    out.push('\n');
    for snapshot in snapshots {
        out.push_str(&render_details(snapshot));
    }

    out
}

/// 摘要表格：每主机一行
fn render_summary_table(snapshots: &[HostSnapshot]) -> String {
    let headers = [
        "Server",
        "Port",
        "Status",
        "CPU (curr.)",
        "Load Avg (5m)",
        "Cores",
        "Memory",
        "Disk",
        "Cont. (act)",
        "Cont. (total)",
    ];

    let rows: Vec<Vec<String>> = snapshots
        .iter()
        .map(|snapshot| {
            let summary = Summary::from_snapshot(snapshot);
            if snapshot.available {
                vec![
                    summary.hostname,
                    summary.port,
                    summary.status,
                    summary.cpu_usage,
                    summary.cpu_load_relative,
                    summary.cpu_cores,
                    format!("{} ({})", summary.memory_usage, summary.memory_percent),
                    format!("{} ({})", summary.disk_usage, summary.disk_percent),
                    summary.containers_running,
                    summary.containers_total,
                ]
            } else {
                let error = summary.error.unwrap_or_default();
                vec![
                    summary.hostname,
                    summary.port,
                    format!("{}: {}", summary.status, error),
                    "N/A".to_string(),
                    "N/A".to_string(),
                    "N/A".to_string(),
                    "N/A".to_string(),
                    "N/A".to_string(),
                    "N/A".to_string(),
                    "N/A".to_string(),
                ]
            }
        })
        .collect();

    render_table(&headers, &rows)
}

/// 单主机详情段
fn render_details(snapshot: &HostSnapshot) -> String {
    let mut out = String::new();

    if !snapshot.available {
        let _ = write!(
            out,
            "\n\n### Server: {} - UNAVAILABLE ###\nError: {}\n",
            snapshot.hostname,
            snapshot.error.as_deref().unwrap_or("")
        );
        return out;
    }

    let _ = write!(out, "\n\n### Server: {} ###\n", snapshot.hostname);

    // 系统信息
    let system = &snapshot.system_info;
    out.push_str("\n--- System Information ---\n");
    let _ = writeln!(out, "OS: {}", system.os.as_deref().unwrap_or("N/A"));
    let _ = writeln!(out, "Kernel: {}", system.kernel.as_deref().unwrap_or("N/A"));
    let _ = writeln!(out, "Uptime: {}", system.uptime.as_deref().unwrap_or("N/A"));

    // 资源信息
    let resources = &snapshot.resources;
    out.push_str("\n--- Resources ---\n");
    match resources.cpu_usage_current {
        Some(usage) => {
            let _ = writeln!(out, "CPU current load: {}%", usage);
        }
        None => out.push_str("CPU current load: N/A%\n"),
    }

    if let Some(load) = &resources.cpu_load {
        out.push_str("Load Average:\n");
        let _ = writeln!(out, "  1 min: {}", load.load_1m);
        let _ = writeln!(out, "  5 min: {}", load.load_5m);
        let _ = writeln!(out, " 15 min: {}", load.load_15m);
    }

    if let Some(relative) = &resources.cpu_load_relative {
        out.push_str("Relative CPU load (% of available cores):\n");
        let _ = writeln!(out, "  1 min: {}%", relative.load_1m_percent);
        let _ = writeln!(out, "  5 min: {}%", relative.load_5m_percent);
        let _ = writeln!(out, " 15 min: {}%", relative.load_15m_percent);
    }

    match resources.cpu_cores {
        Some(cores) => {
            let _ = writeln!(out, "Number of cores: {}", cores);
        }
        None => out.push_str("Number of cores: N/A\n"),
    }

    if let Some(memory) = &resources.memory {
        out.push_str("Memory:\n");
        let _ = writeln!(out, "  Total: {}", format_bytes(memory.total));
        let _ = writeln!(
            out,
            "  Used: {} ({}%)",
            format_bytes(memory.used),
            memory.usage_percent
        );
        let _ = writeln!(out, "  Free: {}", format_bytes(memory.free));
    }

    for disk in &resources.disks {
        let _ = writeln!(out, "Disk ({}):", disk.mount_point);
        let _ = writeln!(out, "  Device: {}", disk.device);
        let _ = writeln!(out, "  Total: {}", format_bytes(disk.total));
        let _ = writeln!(
            out,
            "  Used: {} ({}%)",
            format_bytes(disk.used),
            disk.usage_percent
        );
        let _ = writeln!(out, "  Free: {}", format_bytes(disk.free));
    }

    // Docker 信息
    let docker = &snapshot.docker;
    out.push_str("\n--- Docker ---\n");
    if !docker.installed {
        out.push_str("Docker is not installed\n");
        return out;
    }

    let _ = writeln!(out, "Version: {}", docker.version.as_deref().unwrap_or("N/A"));

    if let Some(info) = &docker.info {
        let _ = writeln!(out, "Running containers: {}", info.containers_running);
        let _ = writeln!(out, "Total containers: {}", info.containers_total);
        let _ = writeln!(out, "Images: {}", info.images);
        let _ = writeln!(out, "Storage Driver: {}", info.storage_driver);
        let _ = writeln!(out, "Cgroup Driver: {}", info.cgroup_driver);
    }

    // 运行中容器
    if !docker.containers.running.is_empty() {
        out.push_str("\n--- Running Containers ---\n");
        let rows: Vec<Vec<String>> = docker
            .containers
            .running
            .iter()
            .map(|container| {
                let (cpu, memory) = match &container.stats {
                    Some(stats) => (stats.cpu_perc.clone(), stats.mem_usage.clone()),
                    None => ("N/A".to_string(), "N/A".to_string()),
                };
                vec![
                    container.name.clone(),
                    container.image.clone(),
                    container.status.clone(),
                    cpu,
                    memory,
                ]
            })
            .collect();
        out.push_str(&render_table(
            &["Name", "Image", "Status", "CPU %", "Memory"],
            &rows,
        ));
        out.push('\n');
    }

    // 镜像列表：只展示前 10 条，剩余以计数提示
    if !docker.images.is_empty() {
        out.push_str("\n--- Docker Images ---\n");
        let rows: Vec<Vec<String>> = docker
            .images
            .iter()
            .take(MAX_IMAGES_SHOWN)
            .map(|image| {
                vec![
                    image.repository.clone(),
                    image.tag.clone(),
                    image.id.clone(),
                    image.size.clone(),
                ]
            })
            .collect();
        out.push_str(&render_table(&["Repository", "Tag", "ID", "Size"], &rows));
        out.push('\n');

        if docker.images.len() > MAX_IMAGES_SHOWN {
            let _ = writeln!(
                out,
                "...and {} more images...",
                docker.images.len() - MAX_IMAGES_SHOWN
            );
        }
    }

    out
}

/// 渲染带边框的等宽表格
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(columns) {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let separator = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };

    let render_row = |cells: &[String]| {
        let mut line = String::from("|");
        for (i, width) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let _ = write!(line, " {:<width$} |", cell, width = *width);
        }
        line
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

    let mut out = String::new();
    out.push_str(&separator);
    out.push('\n');
    out.push_str(&render_row(&header_cells));
    out.push('\n');
    out.push_str(&separator);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&separator);
    out
}
