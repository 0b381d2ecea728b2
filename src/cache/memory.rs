//! Free memory sampling.

use std::sync::atomic::{AtomicU64, Ordering};

use sysinfo::System;

/// Source of free memory readings for pressure-based eviction.
pub trait MemoryProbe: Send + Sync {
    /// Free memory in bytes, or `None` when it cannot be determined.
    fn free_memory_bytes(&self) -> Option<u64>;
}

/// Reads the host's available memory through `sysinfo`.
///
/// Returns `None` on platforms `sysinfo` does not support, or when the
/// reading comes back as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMemory;

impl MemoryProbe for SystemMemory {
    fn free_memory_bytes(&self) -> Option<u64> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return None;
        }
        let mut system = System::new();
        system.refresh_memory();
        match system.available_memory() {
            0 => None,
            bytes => Some(bytes),
        }
    }
}

const UNKNOWN: u64 = u64::MAX;

/// A settable reading, for tests and for hosts that report memory elsewhere.
#[derive(Debug)]
pub struct StaticMemory {
    bytes: AtomicU64,
}

impl StaticMemory {
    pub fn new(bytes: Option<u64>) -> Self {
        Self {
            bytes: AtomicU64::new(bytes.unwrap_or(UNKNOWN)),
        }
    }

    /// Convenience constructor taking mebibytes.
    pub fn mebibytes(mb: u64) -> Self {
        Self::new(Some(mb * 1024 * 1024))
    }

    pub fn set(&self, bytes: Option<u64>) {
        self.bytes.store(bytes.unwrap_or(UNKNOWN), Ordering::Relaxed);
    }
}

impl MemoryProbe for StaticMemory {
    fn free_memory_bytes(&self) -> Option<u64> {
        match self.bytes.load(Ordering::Relaxed) {
            UNKNOWN => None,
            bytes => Some(bytes),
        }
    }
}

/// True when a valid sample is below `threshold_mb` mebibytes.
///
/// A sample that rounds down to zero MiB is treated as a failed measurement.
pub fn is_low_memory(sample: Option<u64>, threshold_mb: u64) -> bool {
    match sample {
        Some(bytes) => {
            let mb = bytes / (1024 * 1024);
            mb != 0 && mb < threshold_mb
        }
        None => false,
    }
}
