use anyhow::Result;
use mcsmp::Registry;

pub fn run(name: &str, slug: &str, world: Option<&str>, enabled: bool) -> Result<()> {
    let ledger = Registry::load()?.open(name)?;
    let slug = slug.to_lowercase();

    match mcsmp::set_package_enabled(&ledger, &slug, world, enabled)? {
        Some(_) => println!(
            "✓ Project {} in \"{}\" is now {}",
            slug,
            name,
            if enabled { "enabled" } else { "disabled" }
        ),
        None => println!("✗ The project {} is not installed in \"{}\"", slug, name),
    }

    Ok(())
}
