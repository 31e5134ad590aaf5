// 探测输出解析
// 每个探测都是纯函数：原始输出 -> Result<字段, ParseError>

use thiserror::Error;

use crate::models::{CpuLoad, CpuLoadRelative, DiskEntry, MemoryUsage};

/// 探测输出解析错误
#[derive(Debug, Error)]
pub enum ParseError {
    /// 输出格式不符合预期
    #[error("Malformed output: {0}")]
    Malformed(String),

    /// 总量为零，比例无法计算
    #[error("Total is zero")]
    ZeroTotal,
}

/// 四舍五入到两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 解析 /proc/loadavg 输出
/// 取前三个空白分隔的浮点值（1m/5m/15m）
pub fn parse_load_avg(output: &str) -> Result<CpuLoad, ParseError> {
    let mut parts = output.split_whitespace();
    let mut next_load = |name: &str| {
        parts
            .next()
            .and_then(|p| p.parse::<f64>().ok())
            .ok_or_else(|| ParseError::Malformed(format!("missing {} load", name)))
    };

    Ok(CpuLoad {
        load_1m: next_load("1m")?,
        load_5m: next_load("5m")?,
        load_15m: next_load("15m")?,
    })
}

/// 解析 top -bn1 的 Cpu(s) 汇总行
/// user 与 system 百分比之和，保留两位小数
pub fn parse_cpu_usage(output: &str) -> Result<f64, ParseError> {
    let mut fields = output.split(',');

    // 第一段形如 "%Cpu(s):  1.2 us"，第二个空白分隔 token 是 user 百分比
    let user = fields
        .next()
        .and_then(|f| f.split_whitespace().nth(1))
        .and_then(|v| v.parse::<f64>().ok())
        .ok_or_else(|| ParseError::Malformed("missing user cpu field".to_string()))?;

    // 第二段形如 " 0.3 sy"，首个 token 是 system 百分比
    let system = fields
        .next()
        .and_then(|f| f.split_whitespace().next())
        .and_then(|v| v.parse::<f64>().ok())
        .ok_or_else(|| ParseError::Malformed("missing system cpu field".to_string()))?;

    Ok(round2(user + system))
}

/// 解析 nproc 输出
pub fn parse_core_count(output: &str) -> Result<u32, ParseError> {
    output
        .trim()
        .parse::<u32>()
        .map_err(|_| ParseError::Malformed(format!("invalid core count '{}'", output.trim())))
}

/// 相对负载：load / cores * 100，保留两位小数
/// 核心数为零时不可计算
pub fn relative_load(load: &CpuLoad, cores: u32) -> Option<CpuLoadRelative> {
    if cores == 0 {
        return None;
    }
    let cores = f64::from(cores);
    Some(CpuLoadRelative {
        load_1m_percent: round2(load.load_1m / cores * 100.0),
        load_5m_percent: round2(load.load_5m / cores * 100.0),
        load_15m_percent: round2(load.load_15m / cores * 100.0),
    })
}

/// 解析 free -b 输出
/// 第二行（Mem 行）取 total/used；free = total - used
pub fn parse_memory(output: &str) -> Result<MemoryUsage, ParseError> {
    let line = output
        .lines()
        .nth(1)
        .ok_or_else(|| ParseError::Malformed("missing memory data row".to_string()))?;

    let parts: Vec<&str> = line.split_whitespace().collect();
    // free -b 的 Mem 行含 7 个字段（标签 + 6 个数值）
    if parts.len() < 7 {
        return Err(ParseError::Malformed(format!(
            "unexpected memory row: '{}'",
            line
        )));
    }

    let total: u64 = parts[1]
        .parse()
        .map_err(|_| ParseError::Malformed(format!("invalid total memory '{}'", parts[1])))?;
    let used: u64 = parts[2]
        .parse()
        .map_err(|_| ParseError::Malformed(format!("invalid used memory '{}'", parts[2])))?;

    if total == 0 {
        return Err(ParseError::ZeroTotal);
    }

    Ok(MemoryUsage {
        total,
        used,
        free: total - used,
        usage_percent: round2(used as f64 / total as f64 * 100.0),
    })
}

/// 解析 df -B1 的单行记录
/// 字段：设备 总量 已用 可用 使用率 挂载点
pub fn parse_disk_row(line: &str) -> Result<DiskEntry, ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 6 {
        return Err(ParseError::Malformed(format!(
            "unexpected disk row: '{}'",
            line
        )));
    }

    let total: u64 = parts[1]
        .parse()
        .map_err(|_| ParseError::Malformed(format!("invalid disk total '{}'", parts[1])))?;
    let used: u64 = parts[2]
        .parse()
        .map_err(|_| ParseError::Malformed(format!("invalid disk used '{}'", parts[2])))?;
    let free: u64 = parts[3]
        .parse()
        .map_err(|_| ParseError::Malformed(format!("invalid disk free '{}'", parts[3])))?;

    if total == 0 {
        return Err(ParseError::ZeroTotal);
    }

    Ok(DiskEntry {
        device: parts[0].to_string(),
        mount_point: parts[parts.len() - 1].to_string(),
        total,
        used,
        free,
        usage_percent: round2(used as f64 / total as f64 * 100.0),
    })
}

/// 解析 df -B1 的多行输出（跳过表头）
/// 无法解析的行跳过，不影响其余挂载点
pub fn parse_disks(output: &str) -> Vec<DiskEntry> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| parse_disk_row(line).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_load_avg() {
        let load = parse_load_avg("0.52 0.58 0.59 1/234 5678").unwrap();
        assert_eq!(load.load_1m, 0.52);
        assert_eq!(load.load_5m, 0.58);
        assert_eq!(load.load_15m, 0.59);
    }

    #[test]
    fn test_parse_load_avg_malformed() {
        assert!(parse_load_avg("0.52 0.58").is_err());
        assert!(parse_load_avg("a b c").is_err());
    }

    #[test]
    fn test_parse_cpu_usage_sums_user_and_system() {
        let line = "%Cpu(s):  1.2 us,  0.3 sy,  0.0 ni, 98.4 id,  0.0 wa,  0.0 hi,  0.1 si,  0.0 st";
        assert_eq!(parse_cpu_usage(line).unwrap(), 1.5);
    }

    #[test]
    fn test_parse_cpu_usage_rounds_two_decimals() {
        let line = "%Cpu(s):  1.111 us,  0.222 sy,  0.0 ni";
        assert_eq!(parse_cpu_usage(line).unwrap(), 1.33);
    }

    #[test]
    fn test_parse_core_count() {
        assert_eq!(parse_core_count("8\n").unwrap(), 8);
        assert!(parse_core_count("eight").is_err());
    }

    #[test]
    fn test_relative_load() {
        let load = CpuLoad {
            load_1m: 1.0,
            load_5m: 2.0,
            load_15m: 4.0,
        };
        let relative = relative_load(&load, 8).unwrap();
        assert_eq!(relative.load_1m_percent, 12.5);
        assert_eq!(relative.load_5m_percent, 25.0);
        assert_eq!(relative.load_15m_percent, 50.0);
    }

    #[test]
    fn test_relative_load_zero_cores_is_absent() {
        let load = CpuLoad::default();
        assert!(relative_load(&load, 0).is_none());
    }

    #[test]
    fn test_parse_memory() {
        let output = "\
              total        used        free      shared  buff/cache   available
Mem:    8000000000  4000000000  2000000000   100000000  2000000000  3500000000
Swap:   2000000000           0  2000000000";
        let memory = parse_memory(output).unwrap();
        assert_eq!(memory.total, 8000000000);
        assert_eq!(memory.used, 4000000000);
        assert_eq!(memory.free, 4000000000);
        assert_eq!(memory.usage_percent, 50.0);
    }

    #[test]
    fn test_parse_memory_zero_total_fails() {
        let output = "\
              total        used        free      shared  buff/cache   available
Mem:             0           0           0           0           0           0";
        assert!(matches!(parse_memory(output), Err(ParseError::ZeroTotal)));
    }

    #[test]
    fn test_parse_disk_row() {
        let line = "/dev/sda1 107374182400 53687091200 48318382080 53% /";
        let disk = parse_disk_row(line).unwrap();
        assert_eq!(disk.device, "/dev/sda1");
        assert_eq!(disk.mount_point, "/");
        assert_eq!(disk.total, 107374182400);
        assert_eq!(disk.usage_percent, 50.0);
    }

    #[test]
    fn test_parse_disks_skips_header_and_bad_rows() {
        let output = "\
Filesystem      1B-blocks        Used   Available Use% Mounted on
/dev/sda1    107374182400 53687091200 48318382080  53% /
bad row
/dev/sdb1     10000000000  1000000000  9000000000  10% /data";
        let disks = parse_disks(output);
        assert_eq!(disks.len(), 2);
        assert_eq!(disks[0].mount_point, "/");
        assert_eq!(disks[1].mount_point, "/data");
    }
}
