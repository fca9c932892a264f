// Library root
// -----------
// The binary (`main.rs`) parses arguments and hands off to these modules.
//
// Module responsibilities:
// - `api`: blocking HTTP client for the GIS.ph API and its settings.
// - `config`: the per-user settings file.
// - `update`: version checks and self-update of the install directory.
// - `auto_update`: the once-a-day check that runs after a command.
// - `format`: plain-text table / JSON / key-value rendering.
// - `cli` and `commands`: argument definitions and their handlers.
// - `ui`: terminal styling and spinners.
//
// Only `ui` and `commands` write to the terminal; everything else returns
// values or typed errors.
pub mod api;
pub mod auto_update;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod ui;
pub mod update;
