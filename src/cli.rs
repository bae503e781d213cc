use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

use crate::config::{NameStyle, DEFAULT_MODEL, MODEL_ENV};

pub fn build() -> Command {
    Command::new("rnai")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rename files using GenAI - reads the content and proposes a descriptive name")
        .arg(
            Arg::new("file")
                .help("File to rename")
                .required(true)
                .index(1)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Simulate rename without executing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("style")
                .long("style")
                .help("Naming style hint for the model")
                .value_parser(value_parser!(NameStyle))
                .default_value("kebab"),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .help("Gemini model to use")
                .env(MODEL_ENV)
                .default_value(DEFAULT_MODEL),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase diagnostic output on stderr (-v, -vv, -vvv)")
                .action(ArgAction::Count),
        )
}
