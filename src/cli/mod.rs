// FILE: src/cli/mod.rs

mod config;
mod handlers;

pub use config::ConfigFile;

use crate::error::Result;
use crate::{CompilerOptions, ComponentMode};
use clap::{Arg, ArgAction, Command, ValueEnum};
use std::time::Instant;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
    Single,
    Multi,
}

impl From<Mode> for ComponentMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Single => ComponentMode::Single,
            Mode::Multi => ComponentMode::Multi,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Debug,
}

pub struct EnhancedCli {
    config: ConfigFile,
    start_time: Instant,
}

impl EnhancedCli {
    pub fn new() -> Self {
        Self {
            config: ConfigFile::default(),
            start_time: Instant::now(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.start_time = Instant::now();
        let matches = self.build_cli().get_matches();

        if let Some(config_path) = matches.get_one::<String>("config") {
            self.config = config::load(config_path)?;
        }

        self.setup_logging(matches.get_count("verbose"))?;

        let result = match matches.subcommand() {
            Some(("compile", sub_matches)) => handlers::handle_compile_command(self, sub_matches),
            Some(("check", sub_matches)) => handlers::handle_check_command(self, sub_matches),
            Some(("analyze", sub_matches)) => handlers::handle_analyze_command(self, sub_matches),
            _ => {
                println!("No subcommand specified. Use --help for usage information.");
                Ok(())
            }
        };

        log::debug!("Finished in {}ms", self.start_time.elapsed().as_millis());
        result
    }

    fn build_cli(&self) -> Command {
        Command::new(crate::NAME)
            .version(crate::VERSION)
            .about(crate::DESCRIPTION)
            .author("Mist Development Team")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path (.toml or .json)")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Increase verbosity (can be used multiple times)")
                    .action(ArgAction::Count),
            )
            .subcommand(
                Command::new("compile")
                    .about("Compile .mist.css files to .mist.tsx components")
                    .arg(Arg::new("input").help("Input .mist.css files or directories").required(true).num_args(1..).index(1))
                    .arg(mode_arg())
                    .arg(Arg::new("debug").short('d').long("debug").help("Enable debug mode with per-phase logging").action(ArgAction::SetTrue))
                    .arg(Arg::new("stats").long("stats").help("Show detailed compilation statistics").action(ArgAction::SetTrue))
                    .arg(Arg::new("watch").short('w').long("watch").help("Watch for file changes and recompile").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("check")
                    .about("Check .mist.css files without writing output")
                    .arg(Arg::new("input").help("Input .mist.css file or directory").required(true).index(1))
                    .arg(Arg::new("recursive").short('r').long("recursive").help("Check all .mist.css files in directory recursively").action(ArgAction::SetTrue))
                    .arg(mode_arg()),
            )
            .subcommand(
                Command::new("analyze")
                    .about("Show the component model of a .mist.css file")
                    .arg(Arg::new("input").help("Input .mist.css file").required(true).index(1))
                    .arg(Arg::new("output").short('o').long("output").value_name("FILE").help("Output analysis to file"))
                    .arg(Arg::new("format").short('f').long("format").value_parser(clap::value_parser!(OutputFormat)).default_value("debug").help("Analysis output format"))
                    .arg(mode_arg()),
            )
    }

    fn setup_logging(&self, verbose_count: u8) -> Result<()> {
        let log_level = match verbose_count {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        env_logger::Builder::from_default_env()
            .filter_level(log_level)
            .format_timestamp_secs()
            .init();
        Ok(())
    }

    pub fn build_compiler_options(&self, matches: &clap::ArgMatches) -> Result<CompilerOptions> {
        let mut options = CompilerOptions::default();
        if let Some(mode) = self.config.mode {
            options.mode = mode;
        }
        if let Some(mode) = matches.get_one::<Mode>("mode") {
            options.mode = (*mode).into();
        }
        options.debug_mode = matches.try_get_one::<bool>("debug").ok().flatten().copied().unwrap_or(false)
            || self.config.debug_mode.unwrap_or(false);
        Ok(options)
    }
}

impl Default for EnhancedCli {
    fn default() -> Self {
        Self::new()
    }
}

fn mode_arg() -> Arg {
    Arg::new("mode")
        .short('m')
        .long("mode")
        .value_parser(clap::value_parser!(Mode))
        .help("Allow one component per file (single) or many (multi) [default: multi]")
}
