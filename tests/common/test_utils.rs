use std::sync::Once;
use std::{fs, path::PathBuf};

static INIT_TRACING: Once = Once::new();

/// Install the env-filter subscriber once so `RUST_LOG=debug` surfaces
/// filter events during test runs
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Structure to manage temporary snapshot files that are automatically
/// cleaned up
pub struct TestSnapshot {
    path: PathBuf,
}

impl TestSnapshot {
    /// Create a new snapshot path based on the test name
    pub fn new(test_name: &str) -> Self {
        let path = format!("test_snapshot_{}.blm", test_name).into();
        Self { path }
    }

    /// Get the snapshot path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Drop for TestSnapshot {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}
