use anyhow::Result;
use mcsmp::{Config, LookupCache};

pub fn run_clear(tables: &[String]) -> Result<()> {
    let config = Config::load()?;
    let mut cache = LookupCache::open(config.cache_dir()?)?;

    let tables: Vec<&str> = tables.iter().map(String::as_str).collect();
    let removed = cache.clear(&tables)?;

    if removed.is_empty() {
        println!("Cache was already empty");
    } else {
        for table in removed {
            println!("✓ Cleared {}", table);
        }
    }

    Ok(())
}

pub fn run_path() -> Result<()> {
    let config = Config::load()?;
    println!("{}", config.cache_dir()?.display());
    Ok(())
}
