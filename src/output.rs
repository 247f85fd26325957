// Output rendering for scripted mode. One mutually exclusive mode is
// picked from the CLI flags and threaded through explicitly; rendering
// returns lines so the formats stay testable without capturing stdout.
//
// The argos modes are free-form text contracts consumed by status-bar
// widgets, so their field order and separators are literal.

use crate::api::Measurement;
use crate::config::WidgetSettings;
use crate::ops::{self, Named};

/// How listings are printed. Modes are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Terse human-readable output.
    Plain,
    /// Full field dump including customer, activity and duration.
    Verbose,
    /// Prefix every element with its server id.
    Ids,
    /// Argos/BitBar dropdown lines.
    Argos,
    /// Argos/BitBar button line.
    ArgosButton,
}

impl OutputMode {
    /// Flag precedence mirrors the order the flags are checked when
    /// printing: verbose, id, argos, argosbutton.
    pub fn from_flags(verbose: bool, ids: bool, argos: bool, argosbutton: bool) -> OutputMode {
        if verbose {
            OutputMode::Verbose
        } else if ids {
            OutputMode::Ids
        } else if argos {
            OutputMode::Argos
        } else if argosbutton {
            OutputMode::ArgosButton
        } else {
            OutputMode::Plain
        }
    }
}

/// Rendering context passed to every listing. Carries the widget
/// settings the argos formats embed.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub mode: OutputMode,
    pub widget: WidgetSettings,
}

/// Which measurement endpoint a listing came from; the argos dropdown
/// format differs between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementKind {
    Active,
    Recent,
}

fn duration_or_placeholder(m: &Measurement) -> String {
    ops::elapsed(m).unwrap_or_else(|| "--:--".into())
}

/// Render a projects or activities listing.
pub fn render_named<T: Named>(items: &[T], opts: &OutputOptions) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match opts.mode {
            OutputMode::Verbose => format!("{}: {} (id:{})", i + 1, item.name(), item.id()),
            OutputMode::Ids => format!("{}: {}", item.id(), item.name()),
            _ => item.name().to_string(),
        })
        .collect()
}

/// Render a measurement listing in the selected mode.
pub fn render_measurements(
    items: &[Measurement],
    kind: MeasurementKind,
    opts: &OutputOptions,
) -> Vec<String> {
    if items.is_empty() {
        return match opts.mode {
            OutputMode::Argos => vec!["No active measurements".to_string()],
            OutputMode::ArgosButton => vec!["Tally |".to_string()],
            _ => Vec::new(),
        };
    }

    let mut lines = Vec::new();
    for (i, m) in items.iter().enumerate() {
        match opts.mode {
            OutputMode::Verbose => {
                if items.len() > 1 {
                    lines.push(format!("{}:", i + 1));
                }
                lines.push(format!("   Id: {}", m.id));
                lines.push(format!("   Project: {} (id:{})", m.project.name, m.project.id));
                lines.push(format!(
                    "   Customer: {} (id:{})",
                    m.project.customer.name, m.project.customer.id
                ));
                lines.push(format!("   Activity: {} (id:{})", m.activity.name, m.activity.id));
                lines.push(format!("   Begin: {}", m.begin));
                lines.push(format!("   Duration: {}", duration_or_placeholder(m)));
            }
            OutputMode::Ids => lines.push(format!("{}: {}", m.id, m.label())),
            OutputMode::Argos => match kind {
                MeasurementKind::Recent => lines.push(format!(
                    "--{}, {} | bash={} param1=restart param2={} terminal=false refresh=true",
                    m.project.name, m.activity.name, opts.widget.command, m.id
                )),
                MeasurementKind::Active => lines.push(format!(
                    "{} {}, {} | bash={} param1=stop param2={} terminal=false refresh=true",
                    duration_or_placeholder(m),
                    m.project.name,
                    m.activity.name,
                    opts.widget.command,
                    m.id
                )),
            },
            OutputMode::ArgosButton => lines.push(format!(
                "{} {}, {} | length={}",
                duration_or_placeholder(m),
                m.project.name,
                m.activity.name,
                opts.widget.button_length
            )),
            OutputMode::Plain => {
                if m.is_active() {
                    lines.push(format!("{} {}", duration_or_placeholder(m), m.label()));
                } else {
                    lines.push(m.label());
                }
            }
        }
    }
    lines
}
