//! Kanban Board Frontend Entry Point

mod app;
mod components;
mod config;
mod context;
mod models;
mod storage;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let loaded = config::load_config();
    let config = loaded.clone().unwrap_or_default();
    if let Err(e) = rolling_logger::init_logger(
        config.log_capacity,
        "kanban-board",
        rolling_logger::LevelFilter::DEBUG,
    ) {
        web_sys::console::warn_1(&format!("[APP] logger not installed: {}", e).into());
    }
    if let Err(e) = loaded {
        tracing::warn!("[CONFIG] {} ignored, using defaults: {}", config::CONFIG_KEY, e);
    }

    mount_to_body(move || view! { <App config=config /> });
}
