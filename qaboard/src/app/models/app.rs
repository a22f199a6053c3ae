//! Main application state

use crate::app::forms::FormState;
use crate::cache::Cache;
use crate::store::Store;
use crate::utils::{Config, InputHistory};

use super::{Dropdown, ProjectTab, View};

/// Main application state. Constructed once at startup; the store is owned
/// here and passed down explicitly - no globals.
pub struct App {
    pub config: Config,
    pub store: Store,
    pub cache: Option<Cache>,
    pub history: InputHistory,

    // Tab management
    pub open_tabs: Vec<ProjectTab>,
    pub active_tab_idx: usize,
    pub show_close_confirmation: bool,

    // Project list state
    pub selected: usize,
    pub filter_query: String,
    pub filter_active: bool,

    pub current_view: View,
    pub should_quit: bool,

    // Modal overlays
    pub form: Option<FormState>,
    pub dropdown: Option<Dropdown>,

    // Tokio runtime driving service calls
    pub tokio_runtime: tokio::runtime::Runtime,
}
