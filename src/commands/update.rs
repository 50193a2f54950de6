use super::{create_spinner_callback, Context};
use anyhow::Result;
use mcsmp::{Installer, Registry};

pub fn run(name: &str, world: Option<&str>) -> Result<()> {
    let mut ledger = Registry::load()?.open(name)?;
    let mut ctx = Context::load()?;
    let loaders = ctx.config.loader_table();

    let mut installer = Installer::new(&ctx.catalog, &mut ctx.cache, loaders)
        .with_progress(create_spinner_callback());
    let report = installer.update(&mut ledger, world)?;
    ledger.save()?;

    println!();
    println!(
        "Finally! {} project{} updated in \"{}\" ({} already up to date)",
        report.installed.len(),
        if report.installed.len() == 1 { " has been" } else { "s have been" },
        name,
        report.up_to_date.len()
    );
    if !report.skipped.is_empty() {
        println!("⚠ Skipped: {}", report.skipped.join(", "));
    }
    if !report.errors.is_empty() {
        println!("✗ The following projects failed to update:");
        println!("  {}", report.errors.join(", "));
    }

    Ok(())
}
