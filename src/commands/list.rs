use anyhow::Result;
use mcsmp::{ArtifactState, Category, Registry};

pub fn run(name: &str, world: Option<&str>) -> Result<()> {
    let ledger = Registry::load()?.open(name)?;
    let mut total = 0;

    for &category in Category::for_scope(world) {
        let Some(packages) = ledger.packages(category, world) else {
            continue;
        };
        if packages.is_empty() {
            continue;
        }

        if total > 0 {
            println!();
        }
        match world {
            Some(world) => println!(
                "--== Installed {} for \"{}\" / {} ==--",
                category, name, world
            ),
            None => println!("--== Installed {} for \"{}\" ==--", category, name),
        }
        if !ledger.satisfies(category, world) {
            println!("⚠ The directory is missing settings needed to update these");
        }
        for (slug, filename) in packages {
            let path = mcsmp::installer::locate(ledger.root(), category, world, filename);
            let marker = match mcsmp::artifact::inspect(&path) {
                ArtifactState::Enabled => "",
                ArtifactState::Disabled => " (disabled)",
                ArtifactState::Absent => " (missing)",
            };
            println!("{}{}", slug, marker);
            total += 1;
        }
    }

    if total == 0 {
        println!("No projects installed in \"{}\"", name);
        println!();
        println!("Install projects with: mcsmp install {} <project>", name);
    } else if world.is_none() && ledger.worlds().next().is_some() {
        println!();
        println!(
            "Worlds with datapacks: {}",
            ledger.worlds().collect::<Vec<_>>().join(", ")
        );
    }

    Ok(())
}

pub fn run_check(name: &str, slug: &str, world: Option<&str>) -> Result<()> {
    let ledger = Registry::load()?.open(name)?;
    let slug = slug.to_lowercase();

    match ledger.find(&slug, world) {
        Some(category) => println!(
            "✓ \"{}\" is installed in the directory \"{}\" ({})",
            slug, name, category
        ),
        None => println!("✗ \"{}\" is not installed in the directory \"{}\"", slug, name),
    }

    Ok(())
}
