// `error_chain!` can recurse deeply
#![recursion_limit = "1024"]

extern crate clap;
extern crate filetime;
extern crate regex;
#[macro_use]
extern crate log;
extern crate log4rs;
#[macro_use]
extern crate error_chain;

// For testing in submodules
#[cfg(test)]
extern crate rand;

use clap::{App, Arg, ArgMatches};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

mod action;
mod config;
mod context;
mod entry;
mod error;
mod mapping;
mod walker;

#[cfg(test)]
mod testutils;

use context::SyncContext;
use error::*;
use mapping::FolderMapping;

use std::env;
use std::path::PathBuf;

fn main() {
    let argument_matches = create_app().get_matches();

    configure_logging(argument_matches.occurrences_of("v"));

    // If there was an error, nicely print it and the related causes
    if let Err(ref error) = run(argument_matches) {
        error!("Error: {}", error);
        for cause in error.iter().skip(1) {
            error!("caused by: {}", cause);
        }
        ::std::process::exit(1);
    } else {
        ::std::process::exit(0);
    }
}

fn create_app<'a, 'b>() -> App<'a, 'b> {
    // Feature ideas:
    // Delete stale destination files no longer present in the vault
    // Skip copies when the destination is already up to date
    App::new("vault-sync")
        .version("0.1")
        .about("A program to sync a note vault's public folders into a static-site project")
        .arg(
            Arg::with_name("rules-file")
                .short("r")
                .long("rules")
                .value_name("FILE")
                .help("Sets the file to read folder mapping rules from, one 'source => dest' per line")
                .takes_value(true)
                .required_unless("map"),
        )
        .arg(
            Arg::with_name("map")
                .short("m")
                .long("map")
                .value_name("RULE")
                .help("Adds a folder mapping rule of the form 'source => dest'")
                .takes_value(true)
                .multiple(true)
                .required_unless("rules-file"),
        )
        .arg(
            Arg::with_name("source-dir")
                .short("s")
                .long("source-dir")
                .value_name("DIRECTORY")
                .help("Sets the vault directory to read notes from (default per platform)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("dest-dir")
                .short("d")
                .long("dest-dir")
                .value_name("DIRECTORY")
                .help("Sets the site project directory to copy notes into (default per platform)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("assets-dir")
                .short("a")
                .long("assets-dir")
                .value_name("NAME")
                .help("Sets the name of the flat image directory under the destination")
                .takes_value(true)
                .default_value("public"),
        )
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Sets the level of verbosity"),
        )
        .arg(
            Arg::with_name("dry-run")
                .short("n")
                .long("dry-run")
                .help("Sets whether or not to actually write to the filesystem"),
        )
}

fn configure_logging(verbosity: u64) {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{h({m})}{n}")))
        .build();
    // Progress lines and the banners log at info, so that is the floor
    let level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        2 | _ => LevelFilter::Trace,
    };
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .unwrap();
    log4rs::init_config(config).unwrap();
}

fn run(matches: ArgMatches) -> Result<()> {
    let folder_mapping: FolderMapping = match matches.value_of("rules-file") {
        Some(file) => mapping::mapping_from_file(&PathBuf::from(file))?,
        None => match matches.values_of("map") {
            Some(rules) => mapping::mapping_from_rules(rules)?,
            None => FolderMapping::new(),
        },
    };

    debug!("Loaded {} folder mapping rules", folder_mapping.len());

    let (source_root, dest_root) = config::resolve_roots(
        matches.value_of("source-dir"),
        matches.value_of("dest-dir"),
        env::consts::OS,
    )?;

    // Safe to unwrap, as there is a default
    let assets_name = matches.value_of("assets-dir").unwrap();

    let sync_context = SyncContext {
        assets_dir: dest_root.join(assets_name),
        source_root: source_root,
        dest_root: dest_root,
        dry_run: matches.is_present("dry-run"),
    };

    info!(
        "Syncing {} -> {}",
        sync_context.source_root.to_string_lossy(),
        sync_context.dest_root.to_string_lossy()
    );

    let summary = walker::sync(&folder_mapping, &sync_context)?;

    info!("Sync complete: {} notes, {} images", summary.notes, summary.images);

    Ok(())
}
