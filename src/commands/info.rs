use super::Context;
use anyhow::Result;
use mcsmp::Project;

pub fn run(slug: &str) -> Result<()> {
    let ctx = Context::load()?;
    let project = ctx.catalog.get_project(&slug.to_lowercase())?;

    let title = format!(
        "{} {}",
        project.title.as_deref().unwrap_or(&project.slug),
        project.project_type
    );
    println!("+{}+", "-".repeat(title.len() + 2));
    println!("| {} |", title);
    println!("+{}+", "-".repeat(title.len() + 2));
    println!();

    if let Some(description) = &project.description {
        println!("{}", description);
        println!();
    }
    print_history(&project);

    if !project.categories.is_empty() {
        println!();
        println!("Categories:");
        for category in &project.categories {
            println!("    {}", category);
        }
    }

    if !project.donation_urls.is_empty() {
        println!();
        println!("Ways to donate:");
        for donation in &project.donation_urls {
            println!("    {}: {}", donation.platform, donation.url);
        }
    }

    println!();
    println!("-- DATA --------------------------------");
    println!("Slug:       {}", project.slug);
    println!("Id:         {}", project.id);
    if let Some(license) = &project.license {
        println!("License:    {}", license.name.as_deref().unwrap_or(&license.id));
    }
    print_field("Serverside", project.server_side.as_deref());
    print_field("Clientside", project.client_side.as_deref());

    let links = [
        ("Source", project.source_url.as_deref()),
        ("Discord", project.discord_url.as_deref()),
        ("Wiki", project.wiki_url.as_deref()),
    ];
    if links.iter().any(|(_, url)| url.is_some()) {
        println!();
        println!("-- LINKS -------------------------------");
        for (label, url) in links {
            print_field(label, url);
        }
    }

    Ok(())
}

fn print_history(project: &Project) {
    match (project.published, project.updated) {
        (Some(published), Some(updated)) => println!(
            "Published on {}, last updated on {}",
            published.format("%Y-%m-%d"),
            updated.format("%Y-%m-%d")
        ),
        (Some(published), None) => println!("Published on {}", published.format("%Y-%m-%d")),
        _ => {}
    }
    println!(
        "Downloads: {}, followers: {}",
        project.downloads, project.followers
    );
}

fn print_field(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("{:<11} {}", format!("{}:", label), value);
    }
}
