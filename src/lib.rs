pub mod apply;
mod commands;
pub mod config;
pub mod download;
mod error;
mod http;
mod markup;
pub mod opt;
pub mod resolve;

use std::path::{Path, PathBuf};

use jiff::civil::Date;
use log::info;

pub use apply::{AppleScript, ApplyError, WallpaperSetter};
pub use config::Config;
pub use error::{Error, ErrorKind, ResponseContext};
pub use opt::Opt;
use opt::Cmd;

pub const URL_BASE: &str = "https://www.bing.com";

pub async fn run(opt: Opt) -> anyhow::Result<()> {
    let cmd = opt.cmd.clone().unwrap_or_default();
    if let Cmd::Completion { shell } = cmd {
        Opt::print_completion(&mut std::io::stdout(), shell);
        return Ok(());
    }

    let config = Config::initialize(&opt)?;

    match cmd {
        Cmd::Update => commands::update(&config, &AppleScript::default()).await?,
        Cmd::Url => commands::print_url(&config).await?,
        Cmd::Download => commands::download(&config).await?,
        Cmd::Config { compact } => commands::show_config(&config, compact)?,
        Cmd::Completion { .. } => {}
    }

    Ok(())
}

/// Resolve today's image, save it for `today` and hand it to `setter`.
///
/// Each stage stops the run on its first failure; nothing is retried.
pub async fn update_wallpaper<S>(config: &Config, setter: &S, today: Date) -> Result<PathBuf, Error>
where
    S: WallpaperSetter + ?Sized,
{
    info!("Starting Bing wallpaper download...");
    let client = http::client(config.timeout())?;
    let url = resolve::resolve(&client, &config.homepage, config.resolution).await?;
    let path = download::download(&client, &url, &config.wallpaper_dir, today, !config.quiet).await?;
    apply(setter, &path)?;
    Ok(path)
}

fn apply<S: WallpaperSetter + ?Sized>(setter: &S, path: &Path) -> Result<(), Error> {
    info!("Setting as desktop background...");
    setter.set_wallpaper(path)?;
    info!("Wallpaper set successfully!");
    Ok(())
}
