use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use jiff::civil::Date;
use log::info;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use tempfile::NamedTempFile;
use url::Url;

use crate::{
    error::{Error, ResponseContext},
    http,
};

const PROGRESS_TEMPLATE: &str = "{bytes}/{total_bytes} [{wide_bar}] {eta}";

/// Where the wallpaper for `date` lives inside `dir`
#[must_use]
pub fn wallpaper_path(dir: &Path, date: Date) -> PathBuf {
    dir.join(format!("Bing_Wallpaper_{}.jpg", date.strftime("%Y-%m-%d")))
}

/// Download `url` into today's file under `dir`, returning its absolute path
pub async fn download(
    client: &Client,
    url: &Url,
    dir: &Path,
    today: Date,
    show_progress: bool,
) -> Result<PathBuf, Error> {
    info!("Downloading image...");
    let response = http::get(client, url).await?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
    if !content_type.as_deref().is_some_and(is_image) {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::NotAnImage {
            url: url.clone(),
            content_type,
            response: ResponseContext::new(status, headers, &body),
        });
    }

    let mut staged = Staged::new(dir, today)?;
    stream_body(response, url, &mut staged, show_progress).await?;
    let path = staged.commit()?;
    info!("Successfully downloaded image to {}", path.display());

    Ok(path)
}

fn is_image(content_type: &str) -> bool {
    content_type
        .trim_start()
        .get(..6)
        .is_some_and(|media_type| media_type.eq_ignore_ascii_case("image/"))
}

async fn stream_body(
    response: Response,
    url: &Url,
    staged: &mut Staged,
    show_progress: bool,
) -> Result<(), Error> {
    let progress = match (show_progress, response.content_length()) {
        (false, _) => ProgressBar::hidden(),
        (true, Some(len)) => {
            let bar = ProgressBar::new(len);
            if let Ok(style) = ProgressStyle::with_template(PROGRESS_TEMPLATE) {
                bar.set_style(style.progress_chars("=> "));
            }
            bar
        }
        (true, None) => ProgressBar::new_spinner(),
    };

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|source| Error::Request {
            url: url.clone(),
            source,
        })?;
        staged.write(&chunk)?;
        progress.inc(chunk.len() as u64);
    }
    progress.finish_and_clear();

    Ok(())
}

/// Write `contents` to the file for `today`, replacing any earlier download
/// from the same day
pub fn save(dir: &Path, today: Date, contents: &[u8]) -> Result<PathBuf, Error> {
    let mut staged = Staged::new(dir, today)?;
    staged.write(contents)?;
    staged.commit()
}

/// Today's wallpaper being written to a temporary file next to its final path.
///
/// Nothing appears at the final path until [`Staged::commit`] renames the file
/// into place; dropping it unfinished removes the temporary file.
pub struct Staged {
    file: NamedTempFile,
    path: PathBuf,
}

impl Staged {
    /// Create `dir` if needed and open a temporary file inside it
    pub fn new(dir: &Path, today: Date) -> Result<Self, Error> {
        let path = wallpaper_path(dir, today);
        let write_error = |source| Error::Write {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(dir).map_err(write_error)?;
        let path = std::path::absolute(&path).map_err(write_error)?;
        let file = temp_file(dir).map_err(write_error)?;

        Ok(Self { file, path })
    }

    pub fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.file.write_all(bytes).map_err(|source| Error::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Move the file over today's path, keeping the mode of a file already there
    pub fn commit(self) -> Result<PathBuf, Error> {
        let Self { file, path } = self;
        let write_error = |source| Error::Write {
            path: path.clone(),
            source,
        };

        if let Ok(existing) = std::fs::metadata(&path) {
            file.as_file()
                .set_permissions(existing.permissions())
                .map_err(write_error)?;
        }
        file.persist(&path).map_err(|err| write_error(err.error))?;

        Ok(path)
    }
}

fn temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".Bing_Wallpaper_");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        // the mode `File::create` asks for; the umask still applies
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}
