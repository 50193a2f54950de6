use anyhow::Result;
use mcsmp::Registry;

pub fn run(name: &str, slug: &str, world: Option<&str>) -> Result<()> {
    let mut ledger = Registry::load()?.open(name)?;
    let slug = slug.to_lowercase();

    match mcsmp::uninstall(&mut ledger, &slug, world)? {
        Some(category) => {
            ledger.save()?;
            println!("✓ Deleted {} {} from \"{}\"", category, slug, name);
        }
        None => println!("✗ The project {} is not installed in \"{}\"", slug, name),
    }

    Ok(())
}
