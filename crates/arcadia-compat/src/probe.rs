//! Feature-detection probes
//!
//! Some capabilities can only be confirmed by trying them (creating a 3D
//! context, querying a memory estimate), which the host may implement
//! asynchronously. The checker awaits this trait instead of touching the
//! environment directly, so tests and headless hosts can answer from plain
//! data.

use arcadia_device::EnvironmentSnapshot;

/// Async capability probes the compatibility checker awaits.
pub trait FeatureProbe {
    /// Whether a 3D rendering context can actually be created.
    fn supports_3d(&self) -> impl Future<Output = bool>;

    /// Estimated available memory in megabytes, if the host can tell.
    fn available_memory_mb(&self) -> impl Future<Output = Option<u64>>;
}

/// Probe answering from captured snapshot data; the default for hosts
/// without live probing and for tests.
#[derive(Debug, Clone)]
pub struct SnapshotProbe {
    supports_3d: bool,
    memory_mb: Option<u64>,
}

impl SnapshotProbe {
    /// Build from an environment snapshot. 3D support is assumed until a
    /// live probe says otherwise.
    pub fn from_env(env: &EnvironmentSnapshot) -> Self {
        Self {
            supports_3d: true,
            memory_mb: env.device_memory_mb,
        }
    }

    pub fn without_3d(mut self) -> Self {
        self.supports_3d = false;
        self
    }

    pub fn with_memory_mb(mut self, memory_mb: u64) -> Self {
        self.memory_mb = Some(memory_mb);
        self
    }
}

impl FeatureProbe for SnapshotProbe {
    async fn supports_3d(&self) -> bool {
        self.supports_3d
    }

    async fn available_memory_mb(&self) -> Option<u64> {
        self.memory_mb
    }
}
