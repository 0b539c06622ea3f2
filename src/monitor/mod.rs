// Monitoring: the refresh cycle and the dashboard state it maintains.

pub mod refresh;
pub mod state;

pub use refresh::{launch_refresh, spawn_refresh_loop, Monitor, RefreshStatus, RefreshSummary};
pub use state::{DashboardItem, MonitorState};
