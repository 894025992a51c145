use std::time::Duration;

use jutsu::prelude::*;
use jutsu_downloader::{DownloadRequest, DownloaderError, download};

use crate::logger::*;
use crate::progress::*;

/// downloads episodes through the shared client while drawing progress.
pub struct ProgressFetcher<'a> {
    client: &'a JutsuClient,
    logger: &'a CliLogger,
}

impl<'a> ProgressFetcher<'a> {
    pub fn new(client: &'a JutsuClient, logger: &'a CliLogger) -> Self {
        Self { client, logger }
    }
}

impl VideoFetcher for ProgressFetcher<'_> {
    type Error = DownloaderError;

    async fn fetch(&self, target: &DownloadTarget) -> std::result::Result<u64, DownloaderError> {
        self.client.wait_turn().await;

        let request = DownloadRequest::new(&target.video_url, &target.path)
            .referer(&target.episode_url);
        let mut progress_renderer =
            DownloadProgressRenderer::new(self.logger.level >= LogLevel::Info);
        let (events_tx, mut events_rx) = tokio::sync::mpsc::unbounded_channel();
        let mut tick = tokio::time::interval(Duration::from_millis(80));
        let mut download_fut = std::pin::pin!(download(self.client.http(), request, move |event| {
            let _ = events_tx.send(event);
        }));

        let download_result = loop {
            tokio::select! {
                result = &mut download_fut => break result,
                maybe_event = events_rx.recv() => {
                    if let Some(event) = maybe_event {
                        progress_renderer.handle(event);
                    }
                }
                _ = tick.tick() => {
                    progress_renderer.tick();
                }
            }
        };

        while let Ok(event) = events_rx.try_recv() {
            progress_renderer.handle(event);
        }

        download_result
    }
}
