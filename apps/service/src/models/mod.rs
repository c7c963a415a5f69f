/// Data model shared by the engine, the stores and the routing layer
pub mod monitor;

pub use monitor::{
    CheckStatus, DEFAULT_INTERVAL_MINUTES, HISTORY_CAPACITY, Monitor, MonitorHistory,
    MonitorStatus, normalize_url,
};
