use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use mcsmp::{Catalog, Config, LookupCache, ProgressCallback};
use std::sync::{Arc, Mutex};

pub mod cache;
pub mod config;
pub mod dirs;
pub mod info;
pub mod install;
pub mod list;
pub mod toggle;
pub mod uninstall;
pub mod update;

/// Configuration, catalog client and lookup cache for one invocation
pub struct Context {
    pub config: Config,
    pub catalog: Catalog,
    pub cache: LookupCache,
}

impl Context {
    pub fn load() -> Result<Self> {
        let config = Config::load()?;
        let catalog = Catalog::from_config(&config)?;
        let cache = LookupCache::open(config.cache_dir()?)?;
        Ok(Self {
            config,
            catalog,
            cache,
        })
    }
}

/// Create an indicatif-based progress callback for CLI display
pub fn create_spinner_callback() -> ProgressCallback {
    let spinner = Arc::new(Mutex::new(None::<ProgressBar>));

    Arc::new(move |msg: &str, current: u64, total: u64| {
        let Ok(mut slot) = spinner.lock() else {
            return;
        };
        if current >= total && total > 0 {
            if let Some(s) = slot.take() {
                s.finish_and_clear();
            }
            return;
        }
        let s = slot.get_or_insert_with(|| {
            let s = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.green} {msg}") {
                s.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
            }
            s.enable_steady_tick(std::time::Duration::from_millis(80));
            s
        });
        s.set_message(msg.to_string());
    })
}
