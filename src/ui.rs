// UI layer: the interactive main menu and the selection prompts, built
// on `dialoguer`. Flows are small and synchronous; every operation is
// caught at its own boundary so the menu loop survives failures.

use anyhow::Result;
use dialoguer::{FuzzySelect, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::api::{ApiClient, Measurement};
use crate::ops::{self, Named};
use crate::output::{self, MeasurementKind, OutputOptions};

/// Run `f` while a spinner is shown. The spinner is cleared before any
/// result is printed.
fn with_spinner<T>(msg: &str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message(msg.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let out = f();
    spinner.finish_and_clear();
    out
}

/// Main interactive menu. Loops until the user chooses "Exit"; a failed
/// operation is reported and control returns to the menu.
pub fn main_menu(api: &ApiClient, opts: &OutputOptions) -> Result<()> {
    let items = [
        "Restart recent measurement",
        "Start new measurement",
        "Stop all active measurements",
        "Stop an active measurement",
        "List active measurements",
        "List recent measurements",
        "List projects",
        "List activities",
        "Exit",
    ];
    loop {
        println!();
        let selection = Select::new()
            .with_prompt("Select command")
            .items(&items)
            .default(0)
            .interact()?;

        let outcome = match selection {
            0 => restart_flow(api),
            1 => start_flow(api),
            2 => stop_all_flow(api),
            3 => stop_one_flow(api),
            4 => list_measurements_flow(api, MeasurementKind::Active, opts),
            5 => list_measurements_flow(api, MeasurementKind::Recent, opts),
            6 => list_projects_flow(api, opts),
            7 => list_activities_flow(api, opts),
            _ => break,
        };
        if let Err(e) = outcome {
            eprintln!("Error: {e:#}");
        }
    }
    Ok(())
}

/// Plain list picker over `Project | Activity` labels. Returns the id of
/// the chosen measurement.
fn select_measurement(measurements: &[Measurement]) -> Result<i64> {
    let labels: Vec<String> = measurements.iter().map(Measurement::label).collect();
    let index = Select::new()
        .with_prompt("Select measurement")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(measurements[index].id)
}

/// Fuzzy-filtered picker over names; the candidate list narrows on every
/// keystroke. Returns the id of the chosen element.
fn select_named<T: Named>(prompt: &str, items: &[T]) -> Result<i64> {
    let names: Vec<&str> = items.iter().map(Named::name).collect();
    let index = FuzzySelect::new()
        .with_prompt(prompt)
        .items(&names)
        .default(0)
        .interact()?;
    Ok(items[index].id())
}

/// Two sequential prompts (project, then activities scoped to it), then
/// a start request built from the accumulated selection.
pub fn start_flow(api: &ApiClient) -> Result<()> {
    let projects = with_spinner("Loading projects...", || ops::projects(api))?;
    if projects.is_empty() {
        println!("No projects");
        return Ok(());
    }
    let project_id = select_named("Select project", &projects)?;

    let activities =
        with_spinner("Loading activities...", || ops::activities(api, Some(project_id)))?;
    if activities.is_empty() {
        println!("No activities for this project");
        return Ok(());
    }
    let activity_id = select_named("Select activity", &activities)?;

    let id = with_spinner("Starting...", || ops::start(api, project_id, activity_id))?;
    println!("Started: {id}");
    Ok(())
}

/// Pick a recent measurement and restart it.
pub fn restart_flow(api: &ApiClient) -> Result<()> {
    let recent = with_spinner("Loading recent measurements...", || ops::recent(api))?;
    if recent.is_empty() {
        println!("No recent measurements");
        return Ok(());
    }
    let id = select_measurement(&recent)?;
    let restarted = with_spinner("Restarting...", || ops::restart(api, id))?;
    println!("Restarted: {restarted}");
    Ok(())
}

/// Stop every active measurement, reporting each as it completes.
pub fn stop_all_flow(api: &ApiClient) -> Result<()> {
    let stopped = ops::stop_all(api, |m| println!("Stopped: {}", m.id))?;
    if stopped.is_empty() {
        println!("No active measurements");
    }
    Ok(())
}

/// Pick one active measurement and stop it.
pub fn stop_one_flow(api: &ApiClient) -> Result<()> {
    let active = with_spinner("Loading active measurements...", || ops::active(api))?;
    if active.is_empty() {
        println!("No active measurements");
        return Ok(());
    }
    let id = select_measurement(&active)?;
    let stopped = with_spinner("Stopping...", || ops::stop(api, id))?;
    println!("Stopped: {stopped}");
    Ok(())
}

fn list_measurements_flow(
    api: &ApiClient,
    kind: MeasurementKind,
    opts: &OutputOptions,
) -> Result<()> {
    let list = with_spinner("Loading...", || match kind {
        MeasurementKind::Active => ops::active(api),
        MeasurementKind::Recent => ops::recent(api),
    })?;
    for line in output::render_measurements(&list, kind, opts) {
        println!("{line}");
    }
    Ok(())
}

fn list_projects_flow(api: &ApiClient, opts: &OutputOptions) -> Result<()> {
    let list = with_spinner("Loading projects...", || ops::projects(api))?;
    for line in output::render_named(&list, opts) {
        println!("{line}");
    }
    Ok(())
}

fn list_activities_flow(api: &ApiClient, opts: &OutputOptions) -> Result<()> {
    let list = with_spinner("Loading activities...", || ops::activities(api, None))?;
    for line in output::render_named(&list, opts) {
        println!("{line}");
    }
    Ok(())
}
