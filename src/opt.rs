use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use log::LevelFilter;
use std::path::PathBuf;
use url::Url;

use crate::URL_BASE;

#[derive(Debug, Parser)]
#[command(version, flatten_help = true)]
pub struct Opt {
    /// Page to find the image of the day on
    #[arg(long, global = true, default_value = URL_BASE)]
    pub homepage: Url,

    /// Where to save wallpapers [default: ~/Pictures/Bing]
    #[arg(long, global = true)]
    pub wallpaper_dir: Option<PathBuf>,

    /// Resolution to ask for in place of the homepage thumbnail
    #[arg(long, global = true, value_enum, default_value_t)]
    pub size: Resolution,

    /// Seconds to wait on each HTTP request
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,

    /// Only print warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print more about what's happening (repeat for more)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

impl Opt {
    /// Log level to use when `RUST_LOG` isn't set
    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Warn;
        }

        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn print_completion(writer: &mut impl std::io::Write, shell: Shell) {
        use clap::CommandFactory;
        clap_complete::generate(
            shell,
            &mut Self::command(),
            option_env!("CARGO_BIN_NAME").unwrap_or(env!("CARGO_PKG_NAME")),
            writer,
        );
    }
}

#[derive(Debug, Default, Clone, Subcommand)]
pub enum Cmd {
    /// Download today's image and set it as the desktop background (default)
    #[default]
    Update,

    /// Print the URL of today's image without downloading it
    Url,

    /// Download today's image without touching the desktop background
    Download,

    /// Show the resolved configuration
    Config {
        /// Print it on one line
        #[arg(short, long)]
        compact: bool,
    },

    /// Print shell completions
    Completion {
        #[arg(short, long)]
        shell: Shell,
    },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    #[default]
    Uhd,
    Resolution(u16, u16),
}

impl Resolution {
    const ALL: &[Self] = &[
        Self::Uhd,
        Self::Resolution(1920, 1200),
        Self::Resolution(1920, 1080),
        Self::Resolution(1366, 768),
        Self::Resolution(1280, 768),
        Self::Resolution(1024, 768),
        Self::Resolution(800, 600),
        Self::Resolution(800, 480),
        Self::Resolution(768, 1280),
        Self::Resolution(720, 1280),
        Self::Resolution(640, 480),
        Self::Resolution(480, 800),
        Self::Resolution(400, 240),
        Self::Resolution(320, 240),
        Self::Resolution(240, 320),
    ];
}

impl clap::ValueEnum for Resolution {
    fn value_variants<'a>() -> &'a [Self] {
        Self::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.to_string()))
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uhd => write!(f, "UHD"),
            Self::Resolution(w, h) => write!(f, "{w}x{h}"),
        }
    }
}

impl serde::Serialize for Resolution {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
