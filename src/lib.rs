// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the scripted subcommands
// and the interactive menu.
//
// Module responsibilities:
// - `cli`: clap definitions for subcommands and global output flags.
// - `config`: settings file resolution, load/save, first-run setup.
// - `error`: the typed error taxonomy for API interactions.
// - `api`: the blocking HTTP client and server-owned data shapes.
// - `ops`: domain operations (start, stop, restart, list, lookups)
//   composed from `api` calls.
// - `output`: listing renderers for the scripted output modes.
// - `ui`: interactive menu and selection prompts, delegating to `ops`.
//
// Keeping this separation lets the operations and renderers be tested
// against a mocked server without any terminal interaction.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod ops;
pub mod output;
pub mod ui;
