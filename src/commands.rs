use jiff::Zoned;

use crate::{apply::WallpaperSetter, download, http, resolve, Config};

pub async fn update(config: &Config, setter: &impl WallpaperSetter) -> anyhow::Result<()> {
    let today = Zoned::now().date();
    let path = crate::update_wallpaper(config, setter, today).await?;
    println!("{}", path.display());
    Ok(())
}

pub async fn print_url(config: &Config) -> anyhow::Result<()> {
    let client = http::client(config.timeout())?;
    let url = resolve::resolve(&client, &config.homepage, config.resolution).await?;
    println!("{url}");
    Ok(())
}

pub async fn download(config: &Config) -> anyhow::Result<()> {
    let today = Zoned::now().date();
    let client = http::client(config.timeout())?;
    let url = resolve::resolve(&client, &config.homepage, config.resolution).await?;
    let path = download::download(&client, &url, &config.wallpaper_dir, today, !config.quiet).await?;
    println!("{}", path.display());
    Ok(())
}

pub fn show_config(config: &Config, compact: bool) -> anyhow::Result<()> {
    let contents = if compact {
        serde_json::to_string(config)?
    } else {
        serde_json::to_string_pretty(config)?
    };
    println!("{contents}");
    Ok(())
}
