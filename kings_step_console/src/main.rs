// Legend for various fix-this comments:
//   * "TODO" - bug or missing crucial feature.
//   * "Improvement potential" - missing nice-to-have feature or an opportunity
//       to make code better or faster.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod network;
pub mod tui;

mod client_config;
mod client_main;
mod notation_main;

use std::path::Path;

use anyhow::Context;
use clap::{arg, Command};
use client_config::ClientConfig;


fn main() -> anyhow::Result<()> {
    let matches = Command::new("King's Step chess")
        .version(clap::crate_version!())
        .about("Console client for the King's Step chess server")
        .subcommand_required(true)
        .arg(
            arg!(-c --"config" <config_file> "Path to the configuration file: yaml-serialized ClientConfig.")
                .required(false)
                .global(true),
        )
        .subcommand(
            Command::new("play")
                .about("Play interactively")
                .arg(arg!([server_url] "Server URL, e.g. http://localhost:5000")),
        )
        .subcommand(
            Command::new("show")
                .about("Print the current board and exit")
                .arg(arg!([server_url] "Server URL, e.g. http://localhost:5000")),
        )
        .subcommand(
            Command::new("notation")
                .about("Print algebraic notation for a move")
                .arg(arg!(<piece> "Piece letter: P, N, B, R, Q or K"))
                .arg(arg!(<from> "Origin square"))
                .arg(arg!(<to> "Destination square"))
                .arg(arg!(--capture "The move is a capture"))
                .arg(arg!(--"special-step" "The move is a King's Step"))
                .arg(arg!(--check "The move gives check"))
                .arg(arg!(--mate "The move gives checkmate"))
                .arg(arg!(--unicode "Use Unicode capture mark")),
        )
        .get_matches();

    let client_config = match matches.get_one::<String>("config") {
        Some(path) => ClientConfig::load(Path::new(path))?,
        None => ClientConfig::default(),
    };

    // Logs go to stderr: stdout is redrawn by the interactive client.
    let mut logger = env_logger::Builder::new();
    logger.target(env_logger::Target::Stderr).filter_level(log::LevelFilter::Info);
    if let Some(filter) = &client_config.log_filter {
        logger.parse_filters(filter);
    }
    logger.parse_default_env().init();

    let server_url = |sub_matches: &clap::ArgMatches| -> anyhow::Result<String> {
        sub_matches
            .get_one::<String>("server_url")
            .cloned()
            .or_else(|| client_config.server_url.clone())
            .context("Server URL is required: pass it as an argument or set `server_url` in the config")
    };

    match matches.subcommand() {
        Some(("play", sub_matches)) => client_main::run(client_main::PlayConfig {
            server_url: server_url(sub_matches)?,
            client: client_config.clone(),
        }),
        Some(("show", sub_matches)) => client_main::show(client_main::PlayConfig {
            server_url: server_url(sub_matches)?,
            client: client_config.clone(),
        }),
        Some(("notation", sub_matches)) => notation_main::run(notation_main::NotationConfig {
            piece: sub_matches.get_one::<String>("piece").cloned().unwrap_or_default(),
            from: sub_matches.get_one::<String>("from").cloned().unwrap_or_default(),
            to: sub_matches.get_one::<String>("to").cloned().unwrap_or_default(),
            is_capture: sub_matches.get_flag("capture"),
            is_special_step: sub_matches.get_flag("special-step"),
            is_check: sub_matches.get_flag("check"),
            is_checkmate: sub_matches.get_flag("mate"),
            unicode: sub_matches.get_flag("unicode"),
        }),
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}
