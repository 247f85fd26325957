// Entrypoint for the CLI application.
// - Parses the command line, loads settings (prompting on first run),
//   builds the API client and dispatches.
// - A subcommand runs one operation and exits; no subcommand enters the
//   interactive menu loop.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tally::api::ApiClient;
use tally::cli::{Cli, Commands};
use tally::config::Settings;
use tally::ops;
use tally::output::{self, MeasurementKind, OutputMode, OutputOptions};
use tally::ui;

fn init_logging(verbose: bool) {
    // --verbose turns on debug traces; otherwise RUST_LOG still works.
    let filter = if verbose {
        EnvFilter::new("tally=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tally=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load_or_init()?;
    let api = ApiClient::new(&settings.server)?;
    let opts = OutputOptions {
        mode: OutputMode::from_flags(cli.verbose, cli.id, cli.argos, cli.argosbutton),
        widget: settings.widget.clone(),
    };

    match cli.command {
        Some(command) => dispatch(command, &api, &settings, &opts),
        None => ui::main_menu(&api, &opts),
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

fn dispatch(command: Commands, api: &ApiClient, settings: &Settings, opts: &OutputOptions) -> Result<()> {
    match command {
        Commands::Start { project, activity } => match (project, activity) {
            (Some(project), Some(activity)) => {
                let project_id = ops::find_project_id(api, &project)?;
                let activity_id = ops::find_activity_id(api, &activity)?;
                let id = ops::start(api, project_id, activity_id)?;
                println!("Started: {id}");
            }
            // Missing names fall back to the interactive pickers.
            _ => ui::start_flow(api)?,
        },
        Commands::Restart { id } => match id {
            Some(id) => {
                let restarted = ops::restart(api, id)?;
                println!("Restarted: {restarted}");
            }
            None => ui::restart_flow(api)?,
        },
        Commands::Stop { id } => match id {
            Some(id) => {
                let stopped = ops::stop(api, id)?;
                println!("Stopped: {stopped}");
            }
            None => ui::stop_all_flow(api)?,
        },
        Commands::ListActive => {
            let list = ops::active(api)?;
            print_lines(output::render_measurements(&list, MeasurementKind::Active, opts));
        }
        Commands::ListRecent => {
            let list = ops::recent(api)?;
            print_lines(output::render_measurements(&list, MeasurementKind::Recent, opts));
        }
        Commands::ListProjects => {
            let list = ops::projects(api)?;
            print_lines(output::render_named(&list, opts));
        }
        Commands::ListActivities => {
            let list = ops::activities(api, None)?;
            print_lines(output::render_named(&list, opts));
        }
        Commands::Url => println!("{}", settings.server.url),
    }
    Ok(())
}
