use clap::{Arg, Command as ClapCommand, ArgAction};
use log::{error, LevelFilter};
use std::process;

use sciplane::config::DecodeConfig;
use sciplane::utils::logger::Logger;
use sciplane::commands::{CommandFactory, SciplaneCommandFactory};

fn main() {
    let matches = ClapCommand::new("sciplane")
        .version("0.1")
        .about("Detect scientific image formats and decode their planes")
        .arg(
            Arg::new("input")
                .help("Input image file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("extract")
                .short('e')
                .long("extract")
                .help("Extract plane data")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file; a .png extension writes an image, anything else raw bytes")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("plane")
                .long("plane")
                .help("Index of the plane to extract")
                .value_name("INDEX")
                .required(false),
        )
        .arg(
            Arg::new("region")
                .long("region")
                .help("Region to extract (x,y,width,height)")
                .value_name("REGION")
                .required(false),
        )
        .arg(
            Arg::new("all-planes")
                .long("all-planes")
                .help("Extract every plane, numbering the output files")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("lines")
                .long("lines")
                .help("Print the first N lines of the file with their offsets")
                .value_name("N")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML file overriding the bundled defaults")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Also write log records and reports to this file")
                .value_name("FILE")
                .required(false),
        )
        .get_matches();

    let config = match matches.get_one::<String>("config") {
        Some(path) => match DecodeConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading configuration: {}", e);
                process::exit(1);
            }
        },
        None => DecodeConfig::default(),
    };

    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        config.log_level
    };

    let logger = match matches.get_one::<String>("log-file") {
        Some(log_file) => {
            if let Err(e) = Logger::init_global_logger(&format!("{}.global", log_file), level) {
                eprintln!("Error setting up global logger: {}", e);
                process::exit(1);
            }
            match Logger::new(log_file) {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("Error initializing logger: {}", e);
                    process::exit(1);
                }
            }
        }
        None => {
            env_logger::Builder::new().filter_level(level).init();
            Logger::console()
        }
    };

    let factory = SciplaneCommandFactory::new(config);

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
