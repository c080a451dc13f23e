use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use soter::{
    checker::{CheckScope, LocalChecker, VulnerabilityDatabase},
    config::Config,
    layout::is_wordpress_root,
    model::PackageType,
    output::{OutputFormat, Rendered},
    progress::BarReporter,
    CheckOptions, Orchestrator,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{debug, warn};

/// Exit codes; clap exits with 2 on usage errors by itself.
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
}

#[derive(Parser)]
#[command(name = "soter")]
#[command(
    author,
    version,
    about = "Check WordPress plugins, themes and core for known vulnerabilities"
)]
struct Cli {
    /// WordPress root directory [default: current directory]
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    /// Vulnerability database JSON file
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// Output format (table, csv, json, yaml, ids, count)
    #[arg(short, long)]
    format: Option<String>,

    /// Comma separated fields to display
    #[arg(long)]
    fields: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a single plugin
    CheckPlugin {
        slug: String,

        /// Version to check [default: installed version]
        version: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Check every installed plugin
    CheckPlugins {
        /// Comma separated plugin slugs to skip
        #[arg(long)]
        ignore: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Check a single theme
    CheckTheme {
        slug: String,

        /// Version to check [default: installed version]
        version: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Check every installed theme
    CheckThemes {
        /// Comma separated theme slugs to skip
        #[arg(long)]
        ignore: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Check a WordPress core release
    #[command(visible_alias = "check-wp")]
    CheckWordpress {
        /// Release to check, e.g. 4.7.4
        version: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Check the installed WordPress core
    CheckWordpresses {
        /// Comma separated core slugs to skip, e.g. 474
        #[arg(long)]
        ignore: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Check all plugins, all themes and the core
    CheckSite {
        /// Comma separated slugs to skip
        #[arg(long)]
        ignore: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long = "show-path")]
        show_path: bool,
    },
}

/// Where a check command goes once its options are parsed.
enum Target {
    Plugin(String, Option<String>),
    Theme(String, Option<String>),
    Wordpress(String),
    Batch(PackageType),
    Site,
}

impl Target {
    fn scope(&self) -> Option<CheckScope> {
        match self {
            Target::Batch(package_type) => Some(CheckScope::from(*package_type)),
            Target::Site => Some(CheckScope::Site),
            _ => None,
        }
    }

    /// Whether the command reads anything from the install itself.
    fn needs_install(&self) -> bool {
        match self {
            Target::Plugin(_, version) | Target::Theme(_, version) => version.is_none(),
            Target::Wordpress(_) => false,
            Target::Batch(_) | Target::Site => true,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn run() -> Result<u8> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring config file: {:#}", e);
        Config::default()
    });

    let (target, output, ignore) = match cli.command {
        Commands::Config { init, show_path } => {
            handle_config(init, show_path)?;
            return Ok(exit_codes::SUCCESS);
        }
        Commands::CheckPlugin {
            slug,
            version,
            output,
        } => (Target::Plugin(slug, version), output, None),
        Commands::CheckTheme {
            slug,
            version,
            output,
        } => (Target::Theme(slug, version), output, None),
        Commands::CheckWordpress { version, output } => (Target::Wordpress(version), output, None),
        Commands::CheckPlugins { ignore, output } => {
            (Target::Batch(PackageType::Plugin), output, ignore)
        }
        Commands::CheckThemes { ignore, output } => {
            (Target::Batch(PackageType::Theme), output, ignore)
        }
        Commands::CheckWordpresses { ignore, output } => {
            (Target::Batch(PackageType::Wordpress), output, ignore)
        }
        Commands::CheckSite { ignore, output } => (Target::Site, output, ignore),
    };

    // Options are validated before anything touches the install or database
    let format = output.format.unwrap_or(config.default_format.clone());
    let format = OutputFormat::from_str(&format).map_err(|e| anyhow::anyhow!(e))?;
    let fields = output.fields.unwrap_or(config.default_fields.clone());
    let mut options = CheckOptions::parse(format, Some(fields.as_str()), ignore.as_deref())?;
    if let Some(scope) = target.scope() {
        options = options.with_ignored(config.ignore.for_scope(scope));
    }

    let root = cli
        .path
        .or(config.wordpress_path.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let database_path = match cli.database.or(config.database_path.clone()) {
        Some(path) => path,
        None => bail!(
            "No vulnerability database given. Use --database or set database_path in {}",
            Config::config_path().display()
        ),
    };

    if target.needs_install() && !is_wordpress_root(&root) {
        warn!(
            "{} does not look like a WordPress install; only explicit versions can be checked",
            root.display()
        );
    }

    let orchestrator = build_orchestrator(&root, &database_path)?;

    let rendered = match target {
        Target::Plugin(slug, version) => {
            orchestrator.check_plugin(&slug, version.as_deref(), &options)?
        }
        Target::Theme(slug, version) => {
            orchestrator.check_theme(&slug, version.as_deref(), &options)?
        }
        Target::Wordpress(version) => orchestrator.check_wordpress(&version, &options)?,
        Target::Batch(package_type) => orchestrator.check_batch(package_type, &options)?,
        Target::Site => orchestrator.check_site(&options)?,
    };

    match rendered {
        Rendered::Data(text) => println!("{}", text),
        Rendered::Success(message) => println!("Success: {}", message),
    }

    Ok(exit_codes::SUCCESS)
}

fn build_orchestrator(root: &Path, database_path: &Path) -> Result<Orchestrator<LocalChecker>> {
    let database = VulnerabilityDatabase::load(database_path)?;
    debug!(
        path = %database_path.display(),
        entries = database.len(),
        "Loaded vulnerability database"
    );

    let checker = LocalChecker::from_install(root, database)?;
    debug!(
        root = %root.display(),
        installed = checker.installed().len(),
        "Scanned WordPress install"
    );

    Ok(Orchestrator::new(checker, Box::new(BarReporter::new())))
}

fn init_tracing(verbose: bool) {
    use std::io::IsTerminal;
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    // Show current config
    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'soter config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
