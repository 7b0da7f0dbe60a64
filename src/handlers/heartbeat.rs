//! Heartbeat endpoint handler.
//!
//! Returns server status information, including uptime, memory usage, and a
//! summary of the current view.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use uuid::Uuid;

use crate::dataset::LayerId;
use crate::state::AppState;

/// Static server ID generated at startup
static SERVER_ID: once_cell::sync::Lazy<String> =
    once_cell::sync::Lazy::new(|| Uuid::new_v4().to_string());

/// Server start time
static START_TIME: once_cell::sync::Lazy<SystemTime> = once_cell::sync::Lazy::new(SystemTime::now);

/// Heartbeat response structure
#[derive(Serialize)]
pub struct HeartbeatResponse {
    /// Server ID (unique per instance)
    pub server_id: String,
    /// Current timestamp (ISO 8601 format)
    pub timestamp: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Process memory usage in bytes
    pub memory_usage_bytes: Option<u64>,
    /// Current view information
    pub view: ViewInfo,
    /// Server status
    pub status: String,
}

/// View information structure
#[derive(Serialize)]
pub struct ViewInfo {
    /// Key of the loaded dataset, if any
    pub dataset_key: Option<String>,
    /// Total feature count of the loaded dataset
    pub feature_count: usize,
    /// Currently-active layer
    pub active_layer: LayerId,
    /// Layers the view can switch between
    pub configured_layers: Vec<LayerId>,
    /// Approximate memory used by the dataset in bytes
    pub data_memory_bytes: usize,
}

/// Handle GET /heartbeat requests
pub async fn heartbeat_handler(State(state): State<Arc<AppState>>) -> Json<HeartbeatResponse> {
    // Get current timestamp
    let now = SystemTime::now();
    let timestamp = chrono::DateTime::<chrono::Utc>::from(now)
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    // Calculate uptime
    let uptime = now
        .duration_since(*START_TIME)
        .unwrap_or(Duration::from_secs(0));

    let view_info = {
        let view = state.view.read();
        ViewInfo {
            dataset_key: view.dataset_key.clone(),
            feature_count: view.feature_count(),
            active_layer: view.renderer.active_layer(),
            configured_layers: view.renderer.layers().ids().to_vec(),
            data_memory_bytes: view.data_memory_bytes(),
        }
    };

    let response = HeartbeatResponse {
        server_id: SERVER_ID.clone(),
        timestamp,
        uptime_seconds: uptime.as_secs(),
        memory_usage_bytes: get_memory_usage(),
        view: view_info,
        status: "healthy".to_string(),
    };

    Json(response)
}

/// Get current process memory usage (platform-dependent)
fn get_memory_usage() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        use std::fs::File;
        use std::io::Read;

        // Read from /proc/self/statm on Linux
        let mut statm = String::new();
        if let Ok(mut file) = File::open("/proc/self/statm") {
            if file.read_to_string(&mut statm).is_ok() {
                let parts: Vec<&str> = statm.split_whitespace().collect();
                if parts.len() >= 2 {
                    // RSS (Resident Set Size) is the second value, in pages
                    if let Ok(pages) = parts[1].parse::<u64>() {
                        // Convert pages to bytes (usually 4KB per page)
                        return Some(pages * 4096);
                    }
                }
            }
        }
        None
    }

    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::source::FileDataSource;

    #[test]
    fn test_view_info_for_empty_state() {
        let source = Box::new(FileDataSource::new("/tmp/hazmap-test-data"));
        let state = AppState::new(Config::default(), source).unwrap();

        let view = state.view.read();
        assert_eq!(view.feature_count(), 0);
        assert_eq!(view.data_memory_bytes(), 0);
    }

    #[test]
    fn test_server_id_is_stable() {
        assert_eq!(*SERVER_ID, *SERVER_ID);
        assert!(!SERVER_ID.is_empty());
    }
}
