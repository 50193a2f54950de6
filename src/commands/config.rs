use anyhow::Result;
use mcsmp::Config;

pub fn run(action: &crate::ConfigAction) -> Result<()> {
    use crate::ConfigAction;

    match action {
        ConfigAction::Show => show_config(),
        ConfigAction::Set { key, value } => set_config(key, value),
    }
}

fn show_config() -> Result<()> {
    let config = Config::load()?;
    let config_path = Config::default_path()?;

    println!("Config file: {}", config_path.display());
    println!();
    println!("[catalog]");
    println!("  type:       {}", config.catalog.catalog_type);
    println!("  url:        {}", config.catalog.url);
    if let Some(path) = &config.catalog.path {
        println!("  path:       {}", path.display());
    }
    println!("  user agent: {}", config.catalog.user_agent);
    println!();
    println!("[cache]");
    println!("  dir:        {}", config.cache_dir()?.display());

    if !config.loaders.aliases.is_empty() || !config.loaders.substitutions.is_empty() {
        println!();
        println!("[loaders]");
        for (loader, fallbacks) in &config.loaders.aliases {
            println!("  {} -> {}", loader, fallbacks.join(", "));
        }
        for (loader, table) in &config.loaders.substitutions {
            for (from, to) in table {
                println!("  {}: {} => {}", loader, from, to);
            }
        }
    }

    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    println!("✓ Set {} = {}", key, value);
    Ok(())
}
