use clap::{Parser, Subcommand};
use rpm_inspect::{Evr, InspectOptions, DEFAULT_MAX_DATA_LENGTH};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rpminspect")]
#[command(version)]
#[command(about = "Locates RPM header regions, lists signature key IDs, and orders RPM versions")]
pub(crate) struct Args {
    /// Reject packages whose lead is not valid.
    #[arg(long, global = true)]
    pub strict_lead: bool,

    /// Reject header data stores of this many bytes or more.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DATA_LENGTH)]
    pub max_data_length: u32,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn options(&self) -> InspectOptions {
        InspectOptions {
            strict_lead: self.strict_lead,
            max_data_length: self.max_data_length,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the byte ranges of the signature and main headers.
    Ranges {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the name, version, checksum type, and signatures of packages.
    Info {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Compare two [epoch:]version[-release] strings and print <, =, or >.
    Vercmp { left: Evr, right: Evr },
    /// Print packages ordered by name, then by version.
    Sort {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags() {
        let args = Args::try_parse_from(&["rpminspect", "info", "--strict-lead", "a.rpm"]).unwrap();
        assert!(args.options().strict_lead);
        assert_eq!(args.options().max_data_length, DEFAULT_MAX_DATA_LENGTH);
        match args.command {
            Command::Info { json, files } => {
                assert!(!json);
                assert_eq!(files, [PathBuf::from("a.rpm")]);
            }
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn parses_evrs() {
        let args = Args::try_parse_from(&["rpminspect", "vercmp", "1:2.0-1", "2.0"]).unwrap();
        match args.command {
            Command::Vercmp { left, right } => {
                assert_eq!(left.epoch.as_deref(), Some("1"));
                assert_eq!(right.release, "");
            }
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn files_are_required() {
        assert!(Args::try_parse_from(&["rpminspect", "sort"]).is_err());
    }
}
