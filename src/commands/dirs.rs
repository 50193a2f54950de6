use anyhow::Result;
use mcsmp::{AddOutcome, Error, Registry};

pub fn run_list() -> Result<()> {
    let registry = Registry::load()?;

    if registry.is_empty() {
        println!("No directories defined.");
        println!();
        println!("Register one with: mcsmp add <dir> <path>");
        return Ok(());
    }

    for name in registry.names() {
        match registry.open(name) {
            Ok(ledger) => println!(
                "\"{}\" : {}/{}{} => \"{}\"",
                name,
                ledger.game_version.as_deref().unwrap_or("?"),
                ledger.loader.as_deref().unwrap_or("?"),
                ledger
                    .loader_shader
                    .as_deref()
                    .map(|s| format!(" +{}", s))
                    .unwrap_or_default(),
                ledger.root().display()
            ),
            Err(e @ Error::PathMissing { .. }) => println!("⚠ {}", e),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

pub fn run_add(name: &str, path: &str) -> Result<()> {
    let mut registry = Registry::load()?;

    match registry.add(name, path)? {
        AddOutcome::Added => println!("✓ Directory \"{}\" added", name),
        AddOutcome::Unchanged => println!("✓ Directory \"{}\" is already registered", name),
        AddOutcome::Moved(old) => println!(
            "✓ Directory \"{}\" moved from \"{}\"",
            name,
            old.display()
        ),
    }
    registry.save()?;

    let ledger = registry.open(name)?;
    ledger.save()?;
    match (&ledger.game_version, &ledger.loader) {
        (None, None) => println!("Don't forget to set a game version and a loader"),
        (None, _) => println!("Don't forget to set a game version"),
        (_, None) => println!("Don't forget to set a loader"),
        _ => {}
    }

    Ok(())
}

pub fn run_forget(name: &str) -> Result<()> {
    let mut registry = Registry::load()?;

    if registry.remove(name) {
        registry.save()?;
        println!("✓ Directory \"{}\" removed", name);
    } else {
        println!("⚠ The directory \"{}\" is not defined", name);
    }

    Ok(())
}

pub fn run_version(name: &str, game_version: &str) -> Result<()> {
    let mut ledger = Registry::load()?.open(name)?;
    ledger.game_version = Some(game_version.to_string());
    ledger.save()?;

    println!("✓ Directory \"{}\" set to the version {}", name, game_version);
    Ok(())
}

pub fn run_loader(name: &str, loader: &str, shader: bool) -> Result<()> {
    let mut ledger = Registry::load()?.open(name)?;
    let loader = loader.to_lowercase();

    if shader {
        ledger.loader_shader = Some(loader.clone());
        println!("✓ Directory \"{}\" set to the shader loader {}", name, loader);
    } else {
        ledger.loader = Some(loader.clone());
        println!("✓ Directory \"{}\" set to the loader {}", name, loader);
    }
    ledger.save()?;

    Ok(())
}
