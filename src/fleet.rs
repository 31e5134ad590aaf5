// 批量采集编排
// 以有界并发对全部目标扇出采集任务，逐主机隔离失败

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::collector;
use crate::models::HostSnapshot;
use crate::ssh::SshClient;
use crate::targets::HostTarget;

/// 默认最大并发连接数
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// 整个舰队的巡检结果，每个请求目标恰好对应一条
pub type FleetReport = Vec<HostSnapshot>;

/// 对全部目标执行采集
/// 并发上限为 min(max_concurrency, 目标数)；结果按输入顺序返回，
/// 连接失败的主机产生 available=false 的快照而不是被丢弃
pub async fn collect_all(targets: Vec<HostTarget>, max_concurrency: usize) -> FleetReport {
    let total = targets.len();
    let bound = max_concurrency.min(total).max(1);
    info!(
        "[Fleet] Collecting from {} hosts (up to {} in parallel)",
        total, bound
    );

    let identities: Vec<(String, u16)> = targets
        .iter()
        .map(|t| (t.hostname.clone(), t.port))
        .collect();

    let results = run_bounded(targets, bound, collect_host).await;

    // 任务异常结束（理论上不会发生）也不允许丢条目
    results
        .into_iter()
        .zip(identities)
        .map(|(result, (hostname, port))| {
            result.unwrap_or_else(|| {
                HostSnapshot::unavailable(hostname, port, "Collection task failed")
            })
        })
        .collect()
}

/// 采集单个目标
/// 连接失败立即终止该主机的采集；会话在所有出口路径上释放
async fn collect_host(target: HostTarget) -> HostSnapshot {
    info!("[Fleet] Checking server: {}...", target.label());

    let client = SshClient::new(target.ssh_config());
    let session = match client.connect().await {
        Ok(session) => session,
        Err(e) => {
            warn!("[Fleet] {} unavailable: {}", target.label(), e);
            return HostSnapshot::unavailable(&target.hostname, target.port, e.to_string());
        }
    };

    // collect 不会失败：探测错误都已折叠进快照字段
    let snapshot = collector::collect(&session, &target.hostname, target.port).await;
    let _ = session.close().await;

    info!(
        "[Fleet] Information collection for {} completed",
        target.label()
    );
    snapshot
}

/// 有界并发执行器
/// 返回值按输入顺序排列；任务异常结束的位置为 None
async fn run_bounded<T, R, F, Fut>(items: Vec<T>, limit: usize, f: F) -> Vec<Option<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut,
    Fut: Future<Output = R> + Send + 'static,
{
    let total = items.len();
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let mut join_set = JoinSet::new();

    for (index, item) in items.into_iter().enumerate() {
        let semaphore = semaphore.clone();
        let future = f(item);
        join_set.spawn(async move {
            // acquire 只在 Semaphore 关闭时失败，这里不会发生
            let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
            (index, future.await)
        });
    }

    let mut results: Vec<Option<R>> = (0..total).map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = Some(result),
            Err(e) => warn!("[Fleet] Collection task aborted: {}", e),
        }
    }
    results
}
