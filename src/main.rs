use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::EnvFilter;

mod commands;

/// mcsmp - Manage mods, resource packs, shaders and datapacks for Minecraft installations
#[derive(Parser)]
#[command(name = "mcsmp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show all registered directories
    Dirs,

    /// Register a directory (the root .minecraft folder of an installation)
    Add {
        /// Directory name
        dir: String,
        /// Path to the installation root
        path: String,
    },

    /// Unregister a directory
    Forget {
        /// Directory name
        dir: String,
    },

    /// Set the Minecraft version of a directory
    Version {
        dir: String,
        /// Game version (e.g., 1.20.1)
        game_version: String,
    },

    /// Set the mod loader of a directory
    Loader {
        dir: String,
        /// Loader (e.g., fabric, quilt, forge, neoforge)
        loader: String,
    },

    /// Set the shader loader of a directory
    ShaderLoader {
        dir: String,
        /// Shader loader (e.g., iris, optifine, canvas)
        loader: String,
    },

    /// Show installed projects
    List {
        dir: String,
        /// Show the datapacks of a world instead
        #[arg(short, long)]
        world: Option<String>,
    },

    /// Show info about a project
    Info {
        /// Project slug
        project: String,
    },

    /// Check whether a project is installed
    Check {
        dir: String,
        project: String,
        #[arg(short, long)]
        world: Option<String>,
    },

    /// Install or update a project
    Install {
        dir: String,
        project: String,
        /// Install into a world as a datapack
        #[arg(short, long)]
        world: Option<String>,
    },

    /// Enable a project
    Enable {
        dir: String,
        project: String,
        #[arg(short, long)]
        world: Option<String>,
    },

    /// Disable a project
    Disable {
        dir: String,
        project: String,
        #[arg(short, long)]
        world: Option<String>,
    },

    /// Remove a project
    Remove {
        dir: String,
        project: String,
        #[arg(short, long)]
        world: Option<String>,
    },

    /// Update all projects of a directory
    Update {
        dir: String,
        /// Update the datapacks of a world instead
        #[arg(short, long)]
        world: Option<String>,
    },

    /// Manage the lookup cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Clear cache tables (all of them when none is given)
    Clear {
        /// Table file names (project_slugs.json, version_slugs.json, slug_metadata.json)
        tables: Vec<String>,
    },

    /// Show cache location
    Path,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., catalog.url)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn initialize_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("mcsmp=debug")
    } else {
        EnvFilter::try_from_env("MCSMP_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    initialize_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Dirs => commands::dirs::run_list(),
        Commands::Add { dir, path } => commands::dirs::run_add(&dir, &path),
        Commands::Forget { dir } => commands::dirs::run_forget(&dir),
        Commands::Version { dir, game_version } => {
            commands::dirs::run_version(&dir, &game_version)
        }
        Commands::Loader { dir, loader } => commands::dirs::run_loader(&dir, &loader, false),
        Commands::ShaderLoader { dir, loader } => commands::dirs::run_loader(&dir, &loader, true),
        Commands::List { dir, world } => commands::list::run(&dir, world.as_deref()),
        Commands::Info { project } => commands::info::run(&project),
        Commands::Check {
            dir,
            project,
            world,
        } => commands::list::run_check(&dir, &project, world.as_deref()),
        Commands::Install {
            dir,
            project,
            world,
        } => commands::install::run(&dir, &project, world.as_deref()),
        Commands::Enable {
            dir,
            project,
            world,
        } => commands::toggle::run(&dir, &project, world.as_deref(), true),
        Commands::Disable {
            dir,
            project,
            world,
        } => commands::toggle::run(&dir, &project, world.as_deref(), false),
        Commands::Remove {
            dir,
            project,
            world,
        } => commands::uninstall::run(&dir, &project, world.as_deref()),
        Commands::Update { dir, world } => commands::update::run(&dir, world.as_deref()),
        Commands::Cache { action } => match action {
            CacheAction::Clear { tables } => commands::cache::run_clear(&tables),
            CacheAction::Path => commands::cache::run_path(),
        },
        Commands::Config { action } => commands::config::run(&action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "mcsmp", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
