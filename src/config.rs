use std::{path::PathBuf, time::Duration};

use anyhow::anyhow;
use directories::UserDirs;
use serde::Serialize;
use url::Url;

use crate::{opt::Resolution, Opt};

#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct Config {
    pub homepage: Url,
    pub wallpaper_dir: PathBuf,
    pub resolution: Resolution,
    pub timeout_secs: u64,
    #[serde(skip)]
    pub quiet: bool,
}

impl Config {
    /// Resolve options passed on the command line, filling in the home directory if needed
    pub fn initialize(opt: &Opt) -> anyhow::Result<Self> {
        let wallpaper_dir = match &opt.wallpaper_dir {
            Some(dir) => dir.clone(),
            None => default_wallpaper_dir()?,
        };
        Ok(Self::initialize_with_dir(opt, wallpaper_dir))
    }

    fn initialize_with_dir(opt: &Opt, wallpaper_dir: PathBuf) -> Self {
        Self {
            homepage: opt.homepage.clone(),
            wallpaper_dir,
            resolution: opt.size,
            timeout_secs: opt.timeout,
            quiet: opt.quiet,
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `~/Pictures/Bing`
pub fn default_wallpaper_dir() -> anyhow::Result<PathBuf> {
    let user_dirs = UserDirs::new().ok_or_else(|| anyhow!("Failed to detect the home directory"))?;
    Ok(user_dirs.home_dir().join("Pictures").join("Bing"))
}
