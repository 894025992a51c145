use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use jutsu::prelude::*;

use crate::args::*;
use crate::fetcher::*;
use crate::logger::*;
use crate::prompt::*;
use crate::utils::*;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub download_args: DownloadArgs,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the seasons and episodes of a show without downloading
    List(ListArgs),
    /// Download the selected episodes of a show (default)
    Download(DownloadArgs),
}

#[derive(Debug)]
pub struct App {
    cli: Cli,
    logger: Arc<CliLogger>,
}

impl App {
    pub fn new() -> Self {
        let cli = Cli::parse();
        let log_level = match &cli.command {
            Some(Commands::List(args)) => &args.app_args.log_level,
            Some(Commands::Download(args)) => &args.list.app_args.log_level,
            None => &cli.download_args.list.app_args.log_level,
        };
        let logger = Arc::new(CliLogger::new(log_level));
        init_tracing(Arc::clone(&logger));
        Self { cli, logger }
    }

    pub async fn run(&self) -> ExitCode {
        let result = match &self.cli.command {
            Some(Commands::List(args)) => self.list(args.clone()).await,
            Some(Commands::Download(args)) => self.download(args.clone()).await,
            None => self.download(self.cli.download_args.clone()).await,
        };

        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(JutsuError::Download { .. }) => {
                self.logger
                    .failed("aborted; remaining episodes were not downloaded");
                ExitCode::FAILURE
            }
            Err(err) => {
                self.logger.failed(error_chain(&err));
                ExitCode::FAILURE
            }
        }
    }

    pub async fn list(&self, args: ListArgs) -> Result<()> {
        let logger = &self.logger;

        let url = match &args.url {
            Some(url) if !args.app_args.interactive => url.clone(),
            url => prompt_for_url(url.as_deref())?,
        };
        let url = normalize_show_link(&url)?;
        let client = build_client(&args)?;

        let anime = logger
            .while_loading(
                format!("getting info from: {}", url.yellow()),
                client.get_anime(&url),
            )
            .await?;
        logger.success(format!("title: {}", anime.title.yellow()));

        for (number, season) in (1..).zip(&anime.seasons) {
            logger.success(format!(
                "season {}: {} ({} episodes)",
                number,
                season.title.yellow(),
                season.episodes.len()
            ));
            for (episode, link) in (1..).zip(&season.episodes) {
                logger.debug("episode", format!("#{episode} {link}"));
            }
        }

        Ok(())
    }

    pub async fn download(&self, args: DownloadArgs) -> Result<()> {
        let logger = &self.logger;

        let runtime = prompt_for_args(&args)?;
        let url = normalize_show_link(&runtime.url)?;

        logger.loading("initializing");
        let client = build_client(&args.list)?;
        logger.success(format!("range: {}", runtime.selector.to_string().yellow()));

        let fetcher = ProgressFetcher::new(&client, logger);
        let pipeline = Pipeline::new(&client, fetcher, &args.dir, runtime.selector);

        logger.loading(format!("getting info from: {}", url.yellow()));
        let summary = pipeline
            .run(&url, |event| report(logger, event))
            .await?;

        logger.success(format!(
            "download complete: {} downloaded, {} skipped",
            summary.downloaded.yellow(),
            summary.skipped
        ));
        Ok(())
    }
}

fn build_client(args: &ListArgs) -> Result<JutsuClient> {
    let builder = JutsuBuilder::new().delay(Duration::from_millis(args.delay_ms));
    match &args.user_agent {
        Some(user_agent) => builder.user_agent(user_agent).build(),
        None => builder.build(),
    }
}

fn report(logger: &CliLogger, event: PipelineEvent<'_>) {
    match event {
        PipelineEvent::Listing { anime } => {
            logger.success(format!("title: {}", anime.title.yellow()));
            logger.success(format!("seasons: {}", anime.seasons.len().yellow()));
            logger.success(format!("episodes: {}", anime.episode_count().yellow()));
        }
        PipelineEvent::SeasonSkipped { number, title } => {
            logger.debug("season", format!("skipping season {number}: {title}"));
        }
        PipelineEvent::EpisodeStarted { target } => {
            logger.pending(target.slug());
            logger.debug("episode", format!("video: {}", target.video_url));
        }
        PipelineEvent::EpisodeFinished { target, bytes } => {
            logger.success(format!(
                "{} {}",
                target.slug(),
                format_bytes(bytes).dimmed()
            ));
            logger.debug("episode", format!("saved to {}", target.path.display()));
        }
        PipelineEvent::EpisodeFailed { target, error } => {
            logger.failed(format!("{}: {}", target.slug(), error_chain(error)));
        }
    }
}
