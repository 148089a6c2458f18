//! Integration tests for one-way directory mirroring

mod cli_parse;
mod config_loading;
mod scenarios;
mod support;
