use super::{create_spinner_callback, Context};
use anyhow::Result;
use mcsmp::{InstallOutcome, Installer, Registry};

pub fn run(name: &str, slug: &str, world: Option<&str>) -> Result<()> {
    let mut ledger = Registry::load()?.open(name)?;
    let mut ctx = Context::load()?;
    let loaders = ctx.config.loader_table();

    println!("Installing {} in \"{}\"...", slug, name);
    println!();

    let mut installer = Installer::new(&ctx.catalog, &mut ctx.cache, loaders)
        .with_progress(create_spinner_callback());
    let outcome = installer.install(&mut ledger, slug, world)?;
    ledger.save()?;

    println!();
    match outcome {
        InstallOutcome::Installed => println!("✓ Done!"),
        InstallOutcome::AlreadyCurrent => println!("✓ Nothing to do"),
        InstallOutcome::Skipped => println!("⚠ {} was not installed", slug),
        InstallOutcome::Error => anyhow::bail!("failed to install {}", slug),
    }

    Ok(())
}
