//! Runtime Configuration
//!
//! Optional JSON overrides stored under `kanban.config` in localStorage.

use board_core::{BoardConfig, DomainResult};

pub const CONFIG_KEY: &str = "kanban.config";

/// Stored overrides, or defaults when nothing is stored
pub fn load_config() -> DomainResult<BoardConfig> {
    let raw = web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(CONFIG_KEY).ok().flatten());
    match raw {
        Some(raw) => BoardConfig::from_json(&raw),
        None => Ok(BoardConfig::default()),
    }
}
