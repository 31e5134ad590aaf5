/// CLI argument parsing

use std::path::PathBuf;

use clap::Parser;

use crate::fleet::DEFAULT_MAX_CONCURRENCY;
use crate::report::OutputFormat;

/// 批量巡检远程主机的系统与 Docker 资源信息
#[derive(Parser, Debug)]
#[command(name = "fleetscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File with server list
    #[arg(short = 'f', long = "file", default_value = "servers.txt")]
    pub file: PathBuf,

    /// File to write results
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// SSH private key file
    #[arg(short = 'k', long = "key")]
    pub key: Option<PathBuf>,

    /// SSH password, shared by all hosts
    #[arg(long)]
    pub password: Option<String>,

    /// Results output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Maximum number of parallel connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrent: usize,
}
