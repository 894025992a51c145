use std::time::{Duration, Instant};

use reqwest::Client as ReqwestClient;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info};

use jutsu_core::{Anime, EpisodePage, parse_anime_page, parse_episode_page};

use crate::errors::{JutsuError, Result};
use crate::pipeline::Catalog;

/// spaces consecutive requests at least `delay` apart.
struct Throttle {
    delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Throttle {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: Mutex::new(None),
        }
    }

    async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.delay {
                sleep(self.delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

pub struct JutsuClient {
    base_url: String,
    client: ReqwestClient,
    throttle: Throttle,
}

impl JutsuClient {
    /// creates a client for `base_url` that identifies itself as `user_agent`.
    ///
    /// every request, video downloads included, waits until `delay` has passed
    /// since the previous one.
    pub fn new(base_url: String, user_agent: &str, delay: Duration) -> Result<Self> {
        let client = ReqwestClient::builder()
            .cookie_store(true)
            .user_agent(user_agent)
            .default_headers(Self::headers())
            .build()
            .map_err(JutsuError::BuildClient)?;

        Ok(Self {
            base_url,
            client,
            throttle: Throttle::new(delay),
        })
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ru-RU,ru;q=0.9,en;q=0.8"),
        );
        headers
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn delay(&self) -> Duration {
        self.throttle.delay
    }

    /// the underlying http client, for streaming downloads.
    pub fn http(&self) -> &ReqwestClient {
        &self.client
    }

    /// waits for the inter-request delay; call before any request made through [`Self::http`].
    pub async fn wait_turn(&self) {
        self.throttle.wait().await;
    }

    async fn get_text(&self, url: &str, context: &str) -> Result<String> {
        self.wait_turn().await;
        debug!(url, "GET");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| JutsuError::Request {
                context: context.to_string(),
                source,
            })?;

        if !resp.status().is_success() {
            return Err(JutsuError::HttpStatus {
                context: context.to_string(),
                status: resp.status(),
            });
        }

        resp.text().await.map_err(|source| JutsuError::ResponseBody {
            context: context.to_string(),
            source,
        })
    }

    /// fetches a show listing and groups its episodes into seasons.
    pub async fn get_anime(&self, url: &str) -> Result<Anime> {
        let text = self.get_text(url, "getting anime page").await?;
        let anime = parse_anime_page(&text, &self.base_url)?;
        info!(
            title = %anime.title,
            seasons = anime.seasons.len(),
            episodes = anime.episode_count(),
            "anime page loaded"
        );
        Ok(anime)
    }

    /// fetches an episode page and extracts its title and video url.
    pub async fn get_episode(&self, url: &str, anime_title: &str) -> Result<EpisodePage> {
        let text = self
            .get_text(url, &format!("getting episode page {url}"))
            .await?;
        Ok(parse_episode_page(&text, anime_title)?)
    }
}

impl Catalog for JutsuClient {
    async fn anime(&self, url: &str) -> Result<Anime> {
        self.get_anime(url).await
    }

    async fn episode(&self, url: &str, anime_title: &str) -> Result<EpisodePage> {
        self.get_episode(url, anime_title).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::JutsuBuilder;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LISTING: &str = r#"
        <h1 class="anime_padding_for_title">Смотреть Баки все серии и сезоны</h1>
        <h2 class="the-anime-season">Баки</h2>
        <a class="short-btn green video the_hildi" href="/baki/season-1/episode-1.html">1</a>
        <h2 class="the-anime-season">Баки Ханма</h2>
        <a class="short-btn black video the_hildi" href="/baki/season-2/episode-1.html">1</a>
    "#;

    fn client_for(server: &MockServer, delay: Duration) -> JutsuClient {
        JutsuBuilder::new()
            .base_url(&server.uri())
            .delay(delay)
            .build()
            .expect("client should build")
    }

    #[tokio::test]
    async fn get_anime_sends_user_agent_and_resolves_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/baki/"))
            .and(header("user-agent", "ScraperBot/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::ZERO);
        let anime = client
            .get_anime(&format!("{}/baki/", server.uri()))
            .await
            .expect("listing should load");

        assert_eq!(anime.title, "Баки");
        assert_eq!(anime.seasons.len(), 2);
        assert_eq!(
            anime.seasons[1].episodes,
            vec![format!("{}/baki/season-2/episode-1.html", server.uri())]
        );
    }

    #[tokio::test]
    async fn get_episode_parses_title_and_source() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/baki/episode-3.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<span itemprop="name">Смотреть Баки 3 серия</span>
                   <source src="https://cdn.example/3.mp4">"#,
            ))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::ZERO);
        let episode = client
            .get_episode(&format!("{}/baki/episode-3.html", server.uri()), "Баки")
            .await
            .expect("episode should load");

        assert_eq!(episode.title, "3 серия");
        assert_eq!(episode.video_url, "https://cdn.example/3.mp4");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::ZERO);
        let err = client
            .get_anime(&format!("{}/baki/", server.uri()))
            .await
            .expect_err("503 should fail");

        assert!(matches!(
            err,
            JutsuError::HttpStatus { status, .. } if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        ));
    }

    #[tokio::test]
    async fn consecutive_requests_are_spaced_by_delay() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
            .mount(&server)
            .await;

        let delay = Duration::from_millis(150);
        let client = client_for(&server, delay);
        let url = format!("{}/baki/", server.uri());

        let started = Instant::now();
        client.get_anime(&url).await.expect("first request");
        client.get_anime(&url).await.expect("second request");

        assert!(started.elapsed() >= delay);
    }
}
