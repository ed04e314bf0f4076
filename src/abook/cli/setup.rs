use abook::store::Format;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
    Snapshot,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => Format::Csv,
            FormatArg::Json => Format::Json,
            FormatArg::Snapshot => Format::Snapshot,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "abook", bin_name = "abook", version)]
#[command(about = "Interactive address book for names, phones and birthdays", long_about = None)]
pub struct Cli {
    /// Data file to load on start and save on exit
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Format of the data file (default: from its extension, else csv)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Records per page for `show all`
    #[arg(long, value_name = "N")]
    pub page_size: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Logs go to stderr so they never mix with command output.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("abook=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("abook=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from([
            "abook",
            "--file",
            "/tmp/book.json",
            "--format",
            "snapshot",
            "--page-size",
            "5",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("/tmp/book.json")));
        assert_eq!(cli.format.map(Format::from), Some(Format::Snapshot));
        assert_eq!(cli.page_size, Some(5));
        assert!(cli.verbose);
    }

    #[test]
    fn defaults_are_empty() {
        let cli = Cli::try_parse_from(["abook"]).unwrap();
        assert!(cli.file.is_none());
        assert!(cli.format.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["abook", "--format", "xml"]).is_err());
    }
}
