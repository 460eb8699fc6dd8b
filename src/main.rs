use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;

use bing_daily::{Error, Opt};

#[tokio::main]
async fn main() -> ExitCode {
    let opt = Opt::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(opt.log_level().as_str()))
        .format_timestamp(None)
        .format_target(false)
        .init();

    match bing_daily::run(opt).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Failed to update wallpaper: {err:#}");
            if let Some(diagnostic) = err.downcast_ref::<Error>().and_then(Error::diagnostic) {
                eprintln!("{diagnostic}");
            }
            ExitCode::FAILURE
        }
    }
}
