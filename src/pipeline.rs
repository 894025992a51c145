use std::error::Error as StdError;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use jutsu_core::{Anime, EpisodePage, RangeSelector, episode_file_name, sanitize};

use crate::errors::{JutsuError, Result};

/// where show listings and episode pages come from.
#[allow(async_fn_in_trait)]
pub trait Catalog {
    async fn anime(&self, url: &str) -> Result<Anime>;

    async fn episode(&self, url: &str, anime_title: &str) -> Result<EpisodePage>;
}

impl<C: Catalog + ?Sized> Catalog for &C {
    async fn anime(&self, url: &str) -> Result<Anime> {
        (**self).anime(url).await
    }

    async fn episode(&self, url: &str, anime_title: &str) -> Result<EpisodePage> {
        (**self).episode(url, anime_title).await
    }
}

/// writes the video of a [`DownloadTarget`] to its path.
#[allow(async_fn_in_trait)]
pub trait VideoFetcher {
    type Error: StdError + Send + Sync + 'static;

    /// returns the number of bytes written.
    async fn fetch(&self, target: &DownloadTarget) -> std::result::Result<u64, Self::Error>;
}

/// everything needed to download and name a single episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub anime_title: String,
    pub season_title: String,
    pub season_number: u32,
    pub episode_title: String,
    pub episode_number: u32,
    pub episode_url: String,
    pub video_url: String,
    pub path: PathBuf,
}

impl DownloadTarget {
    /// human readable label, e.g. `Baki - Season 1 - Start (#1)`.
    pub fn slug(&self) -> String {
        format!(
            "{} - {} - {} (#{})",
            self.anime_title, self.season_title, self.episode_title, self.episode_number
        )
    }
}

#[derive(Debug)]
pub enum PipelineEvent<'a> {
    Listing {
        anime: &'a Anime,
    },
    SeasonSkipped {
        number: u32,
        title: &'a str,
    },
    EpisodeStarted {
        target: &'a DownloadTarget,
    },
    EpisodeFinished {
        target: &'a DownloadTarget,
        bytes: u64,
    },
    EpisodeFailed {
        target: &'a DownloadTarget,
        error: &'a (dyn StdError + Send + Sync),
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub downloaded: usize,
    pub skipped: usize,
}

/// drives a whole run: listing, directories, then each selected episode in order.
pub struct Pipeline<C, V> {
    catalog: C,
    fetcher: V,
    root: PathBuf,
    selector: RangeSelector,
}

impl<C: Catalog, V: VideoFetcher> Pipeline<C, V> {
    pub fn new(catalog: C, fetcher: V, root: impl Into<PathBuf>, selector: RangeSelector) -> Self {
        Self {
            catalog,
            fetcher,
            root: root.into(),
            selector,
        }
    }

    /// downloads the selected episodes of the show at `url`.
    ///
    /// stops at the first episode that fails to download; later episodes are
    /// never attempted.
    pub async fn run<F>(&self, url: &str, mut on_event: F) -> Result<RunSummary>
    where
        F: FnMut(PipelineEvent<'_>),
    {
        let anime = self.catalog.anime(url).await?;
        on_event(PipelineEvent::Listing { anime: &anime });

        let anime_dir = self.root.join(sanitize(&anime.title));
        create_dir(&anime_dir).await?;

        let total_seasons = anime.seasons.len() as u32;
        let mut summary = RunSummary::default();
        info!(range = %self.selector, total_seasons, "starting downloads");

        for (season_number, season) in (1u32..).zip(&anime.seasons) {
            if !self.selector.includes_season(season_number) {
                summary.skipped += season.episodes.len();
                on_event(PipelineEvent::SeasonSkipped {
                    number: season_number,
                    title: &season.title,
                });
                continue;
            }

            let season_dir = anime_dir.join(sanitize(&season.title));
            create_dir(&season_dir).await?;

            for (episode_number, episode_url) in (1u32..).zip(&season.episodes) {
                if !self
                    .selector
                    .should_download(season_number, episode_number, total_seasons)
                {
                    debug!(season_number, episode_number, "episode out of range");
                    summary.skipped += 1;
                    continue;
                }

                let page = self.catalog.episode(episode_url, &anime.title).await?;
                let target = DownloadTarget {
                    anime_title: anime.title.clone(),
                    season_title: season.title.clone(),
                    season_number,
                    path: season_dir.join(episode_file_name(episode_number as usize, &page.title)),
                    episode_title: page.title,
                    episode_number,
                    episode_url: episode_url.clone(),
                    video_url: page.video_url,
                };

                on_event(PipelineEvent::EpisodeStarted { target: &target });
                match self.fetcher.fetch(&target).await {
                    Ok(bytes) => {
                        summary.downloaded += 1;
                        on_event(PipelineEvent::EpisodeFinished {
                            target: &target,
                            bytes,
                        });
                    }
                    Err(err) => {
                        error!(episode = %target.slug(), error = %err, "download failed");
                        on_event(PipelineEvent::EpisodeFailed {
                            target: &target,
                            error: &err,
                        });
                        return Err(JutsuError::Download {
                            episode: target.slug(),
                            source: Box::new(err),
                        });
                    }
                }
            }
        }

        Ok(summary)
    }
}

async fn create_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| JutsuError::CreateDir {
            path: path.to_path_buf(),
            source,
        })
}
