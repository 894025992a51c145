mod app;
mod args;
mod constants;
mod fetcher;
mod logger;
mod progress;
mod prompt;
mod utils;

use std::process::ExitCode;

use app::App;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    App::new().run().await
}
