// 数据模型模块

pub mod snapshot;

pub use snapshot::{
    ContainerLimits, ContainerLists, ContainerRecord, ContainerStats, CpuLoad, CpuLoadRelative,
    DiskEntry, DockerDaemonInfo, DockerSection, HostSnapshot, ImageRecord, MemoryUsage,
    ResourceSection, SnapshotBuilder, SystemSection,
};
