//! Wire types for telemetry snapshots.
//!
//! These types match the JSON produced by the telemetry agent, one snapshot
//! per message. Every subsection is optional on the wire: an agent that
//! cannot sample a subsystem (no GPU, no permission for disk usage, ...)
//! omits it rather than sending zeroed data.

use serde::{Deserialize, Serialize};

/// One telemetry sample at a point in time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Producer-side sample time (ISO-8601). Carried opaquely for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<DiskMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu: Option<GpuMetrics>,
    #[serde(default)]
    pub processes: Vec<ProcessInfo>,
}

/// Static host identification, repeated in every snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub platform_release: String,
    #[serde(default)]
    pub processor: String,
    #[serde(default)]
    pub uptime_seconds: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpuMetrics {
    /// Aggregate utilization, 0-100.
    pub percent: f64,
    #[serde(default)]
    pub frequency_mhz: f64,
    #[serde(default)]
    pub cores: CoreCounts,
    /// Per-core utilization in core order, each 0-100.
    #[serde(default)]
    pub percent_per_core: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CoreCounts {
    #[serde(default)]
    pub physical: u32,
    #[serde(default)]
    pub logical: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryMetrics {
    #[serde(rename = "virtual")]
    pub virt: VirtualMemory,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct VirtualMemory {
    pub percent: f64,
    #[serde(default)]
    pub used_gb: f64,
    #[serde(default)]
    pub total_gb: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiskMetrics {
    #[serde(default)]
    pub partitions: Vec<Partition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Partition {
    pub mountpoint: String,
    pub percent: f64,
    #[serde(default)]
    pub used_gb: f64,
    #[serde(default)]
    pub free_gb: f64,
    #[serde(default)]
    pub total_gb: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NetworkMetrics {
    #[serde(default)]
    pub speed: NetworkSpeed,
    #[serde(default)]
    pub io: NetworkIo,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NetworkSpeed {
    #[serde(default)]
    pub upload_bytes_per_sec: f64,
    #[serde(default)]
    pub download_bytes_per_sec: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NetworkIo {
    #[serde(default)]
    pub bytes_sent_mb: f64,
    #[serde(default)]
    pub bytes_recv_mb: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GpuMetrics {
    /// False when the agent has no GPU support; `gpus` is empty then.
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub gpus: Vec<GpuInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GpuInfo {
    pub name: String,
    /// Utilization, 0-100.
    #[serde(default)]
    pub load: f64,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default)]
    pub memory_used: f64,
    #[serde(default)]
    pub memory_total: f64,
    #[serde(default)]
    pub memory_percent: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: i64,
    pub name: String,
    #[serde(default)]
    pub cpu_percent: f64,
    #[serde(default)]
    pub memory_percent: f64,
    #[serde(default)]
    pub status: String,
}

impl Snapshot {
    /// Clamp every percent field into [0, 100].
    ///
    /// Agents occasionally report transient values slightly outside the
    /// range (summed per-core readings, float rounding); display and
    /// statistics both assume the invariant holds.
    pub fn normalize(&mut self) {
        if let Some(cpu) = &mut self.cpu {
            cpu.percent = clamp_percent(cpu.percent);
            for core in &mut cpu.percent_per_core {
                *core = clamp_percent(*core);
            }
        }
        if let Some(memory) = &mut self.memory {
            memory.virt.percent = clamp_percent(memory.virt.percent);
        }
        if let Some(disk) = &mut self.disk {
            for partition in &mut disk.partitions {
                partition.percent = clamp_percent(partition.percent);
            }
        }
        if let Some(gpu) = &mut self.gpu {
            for g in &mut gpu.gpus {
                g.load = clamp_percent(g.load);
                g.memory_percent = clamp_percent(g.memory_percent);
            }
        }
        for proc in &mut self.processes {
            proc.cpu_percent = clamp_percent(proc.cpu_percent);
            proc.memory_percent = clamp_percent(proc.memory_percent);
        }
    }

    /// Aggregate CPU utilization, if the snapshot carried a cpu section.
    pub fn cpu_percent(&self) -> Option<f64> {
        self.cpu.as_ref().map(|c| c.percent)
    }

    /// Virtual memory utilization, if present.
    pub fn memory_percent(&self) -> Option<f64> {
        self.memory.as_ref().map(|m| m.virt.percent)
    }

    /// Upload speed in KB/s, if the snapshot carried a network section.
    pub fn upload_kb(&self) -> Option<f64> {
        self.network.map(|n| n.speed.upload_bytes_per_sec / 1024.0)
    }

    /// Download speed in KB/s, if present.
    pub fn download_kb(&self) -> Option<f64> {
        self.network.map(|n| n.speed.download_bytes_per_sec / 1024.0)
    }
}

fn clamp_percent(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}
