use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use relslash::bump_set::BumpSetData;
use relslash::config::{self, BumpEnv, RepoPaths};
use relslash::git::Git2Repository;
use relslash::orchestrator::BumpOrchestrator;
use relslash::ui;
use relslash::RelslashError;

#[derive(clap::Parser)]
#[command(
    name = "relslash",
    about = "Bump a bosh release across the master and rel/ branches of a tile repository"
)]
struct Args {
    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite Kilnfile.lock on each branch and commit the bump
    Bump {
        #[arg(short, long, help = "Custom settings file path")]
        config: Option<String>,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },
    /// Print the release catalog, branches and locked versions as JSON
    Data {
        #[arg(long, help = "Pretty-print the JSON document")]
        pretty: bool,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("relslash=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Command::Bump { config, dry_run } => run_bump(config.as_deref(), dry_run),
        Command::Data { pretty } => run_data(pretty),
    };

    if let Err(e) = result {
        ui::display_error(&format!("{:#}", e));
        let fatal = e
            .downcast_ref::<RelslashError>()
            .map_or(true, RelslashError::is_fatal);
        if fatal {
            ui::display_warning("stopped before any tile branch was checked out");
        }
        std::process::exit(1);
    }
}

fn run_bump(config_path: Option<&str>, dry_run: bool) -> Result<()> {
    let env = BumpEnv::from_env()?;
    let settings = config::load_settings(config_path)?;

    let mut tile_repo = Git2Repository::open(&env.repos.tile_repo, "tile")?;
    let release_repo = Git2Repository::open(&env.repos.release_repo, "release")?;

    ui::display_status(&format!(
        "getting versions for bosh release {:?} (using HEAD {})",
        env.repos.release_repo.display(),
        release_repo
            .head_name()
            .unwrap_or_else(|_| "HEAD".to_string())
    ));

    let data = BumpSetData::load(&tile_repo, &env.repos.release_repo)?;
    ui::display_bump_set(&data);

    let report = BumpOrchestrator::new(&mut tile_repo, &data.catalog, &env.author, &settings)
        .dry_run(dry_run)
        .run(&data.tile_branches);

    ui::display_bump_report(&report);
    Ok(())
}

fn run_data(pretty: bool) -> Result<()> {
    let repos = RepoPaths::from_env()?;

    let mut tile_repo = Git2Repository::open(&repos.tile_repo, "tile")?;
    let release_repo = Git2Repository::open(&repos.release_repo, "release")?;
    tracing::debug!(
        head = %release_repo.head_name().unwrap_or_else(|_| "HEAD".to_string()),
        "reading release catalog"
    );

    let data = BumpSetData::load(&tile_repo, &repos.release_repo)?;
    let mapping = data.map_tile_branches_to_versions(&mut tile_repo)?;

    println!("{}", data.into_report(mapping).to_json(pretty)?);
    Ok(())
}
