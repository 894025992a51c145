use tracing::debug;

use crate::errors::{CoreError, Result};
use crate::html::{HtmlElement, HtmlQuery, Page};
use crate::sanitize::sanitize;
use crate::season::{EpisodeLink, Season, group_episodes};

/// phrase the site prepends to every "watch ..." heading.
pub const WATCH_PHRASE: &str = "Смотреть";

const TITLE_NOISE: [&str; 3] = [WATCH_PHRASE, "все серии", "и сезоны"];

/// class lists the site uses for episode buttons; the colour alternates per season.
pub const EPISODE_CLASS_LISTS: [&str; 2] = [
    "short-btn black video the_hildi",
    "short-btn green video the_hildi",
];

/// a show listing: its cleaned title and the seasons found on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anime {
    pub title: String,
    pub seasons: Vec<Season>,
}

impl Anime {
    pub fn episode_count(&self) -> usize {
        self.seasons.iter().map(|season| season.episodes.len()).sum()
    }
}

/// what an episode page yields: a display title and the playable video url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodePage {
    pub title: String,
    pub video_url: String,
}

/// parses a show listing page; relative episode links are resolved against `base_url`.
pub fn parse_anime_page(text: &str, base_url: &str) -> Result<Anime> {
    let page = Page::parse(text);

    let raw_title = page
        .find_class("h1", "anime_padding_for_title")
        .ok_or(CoreError::MissingElement {
            page: "anime",
            element: "title heading",
        })?
        .text();
    let title = strip_phrases(&raw_title, &TITLE_NOISE);

    let season_titles: Vec<String> = page
        .find_all_class_lists("h2", &["the-anime-season"])
        .iter()
        .map(|h2| h2.text().trim().to_string())
        .collect();

    let links: Vec<EpisodeLink> = page
        .find_all_class_lists("a", &EPISODE_CLASS_LISTS)
        .into_iter()
        .filter_map(|a| {
            let href = a.attr("href")?;
            Some(EpisodeLink::new(absolute_url(base_url, href), a.class_list()))
        })
        .collect();

    debug!(
        title = %title,
        seasons = season_titles.len(),
        episodes = links.len(),
        "parsed anime page"
    );

    let seasons = group_episodes(links, season_titles, &title);
    Ok(Anime { title, seasons })
}

/// parses an episode page of the show titled `anime_title`.
pub fn parse_episode_page(text: &str, anime_title: &str) -> Result<EpisodePage> {
    let page = Page::parse(text);

    let title = episode_title(&page, anime_title).ok_or(CoreError::MissingElement {
        page: "episode",
        element: "episode title",
    })?;

    let video_url = page
        .find_attr("source", "src", None)
        .and_then(|source| source.attr("src").map(str::to_string))
        .ok_or(CoreError::MissingElement {
            page: "episode",
            element: "video source",
        })?;

    Ok(EpisodePage { title, video_url })
}

/// episodes without their own name fall back to the page's generic
/// "<show> N season M episode" heading, minus the boilerplate.
fn episode_title<Q: HtmlQuery>(page: &Q, anime_title: &str) -> Option<String> {
    if let Some(h2) = page
        .find_class("div", "video_plate_title")
        .and_then(|plate| plate.find("h2"))
    {
        return Some(h2.text().trim().to_string());
    }

    page.find_attr("span", "itemprop", Some("name"))
        .map(|span| strip_phrases(&span.text(), &[WATCH_PHRASE, anime_title]))
}

/// file name for an episode, safe to use as a single path segment.
pub fn episode_file_name(episode_number: usize, title: &str) -> String {
    sanitize(&format!("[#{episode_number}] {title}.mp4"))
}

fn strip_phrases(raw: &str, phrases: &[&str]) -> String {
    phrases
        .iter()
        .filter(|phrase| !phrase.is_empty())
        .fold(raw.to_string(), |text, phrase| text.replace(phrase, ""))
        .trim()
        .to_string()
}

fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    let base = base_url.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{base}{href}")
    } else {
        format!("{base}/{href}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://jut.su";

    const LISTING: &str = r#"
        <html><body>
          <h1 class="header_video anime_padding_for_title">Смотреть Наруто все серии и сезоны</h1>
          <h2 class="b-b-title the-anime-season center">Наруто</h2>
          <a class="short-btn black video the_hildi" href="/naruuto/season-1/episode-1.html">1 серия</a>
          <a class="short-btn black video the_hildi" href="/naruuto/season-1/episode-2.html">2 серия</a>
          <h2 class="the-anime-season">Ураганные хроники</h2>
          <a class="short-btn green video the_hildi" href="/naruuto/season-2/episode-1.html">1 серия</a>
          <a class="short-btn video the_hildi" href="/naruuto/film-1.html">Фильм</a>
          <a class="short-btn green video the_hildi">no href</a>
        </body></html>
    "#;

    #[test]
    fn parses_listing_into_seasons() {
        let anime = parse_anime_page(LISTING, BASE).expect("listing should parse");
        assert_eq!(anime.title, "Наруто");
        assert_eq!(anime.seasons.len(), 2);
        assert_eq!(anime.seasons[0].title, "Наруто");
        assert_eq!(
            anime.seasons[0].episodes,
            vec![
                "https://jut.su/naruuto/season-1/episode-1.html",
                "https://jut.su/naruuto/season-1/episode-2.html",
            ]
        );
        assert_eq!(anime.seasons[1].title, "Ураганные хроники");
        assert_eq!(
            anime.seasons[1].episodes,
            vec!["https://jut.su/naruuto/season-2/episode-1.html"]
        );
        assert_eq!(anime.episode_count(), 3);
    }

    #[test]
    fn buttons_with_extra_classes_are_not_episodes() {
        let html = r#"
            <h1 class="anime_padding_for_title">Смотреть Баки все серии и сезоны</h1>
            <h2 class="the-anime-season">Баки</h2>
            <h2 class="the-anime-season">Сын Огра</h2>
            <a class="short-btn green video the_hildi" href="/baki/episode-1.html">1</a>
            <a class="short-btn green video the_hildi watched" href="/baki/episode-2.html">2</a>
            <a class="short-btn green video the_hildi" href="/baki/episode-3.html">3</a>
        "#;
        let anime = parse_anime_page(html, BASE).expect("listing should parse");
        assert_eq!(anime.seasons.len(), 2);
        assert_eq!(
            anime.seasons[0].episodes,
            vec![
                "https://jut.su/baki/episode-1.html",
                "https://jut.su/baki/episode-3.html",
            ]
        );
        assert!(anime.seasons[1].episodes.is_empty());
    }

    #[test]
    fn single_season_show_uses_anime_title() {
        let html = r#"
            <h1 class="anime_padding_for_title">Смотреть Баки все серии</h1>
            <a class="short-btn green video the_hildi" href="/baki/episode-1.html">1</a>
            <a class="short-btn green video the_hildi" href="/baki/episode-2.html">2</a>
        "#;
        let anime = parse_anime_page(html, "https://jut.su/").expect("listing should parse");
        assert_eq!(anime.title, "Баки");
        assert_eq!(anime.seasons.len(), 1);
        assert_eq!(anime.seasons[0].title, "Баки");
        assert_eq!(anime.seasons[0].episodes.len(), 2);
    }

    #[test]
    fn listing_without_title_is_an_error() {
        let err = parse_anime_page("<html></html>", BASE).expect_err("no title");
        assert!(matches!(err, CoreError::MissingElement { page: "anime", .. }));
    }

    #[test]
    fn episode_page_prefers_plate_title() {
        let html = r#"
            <div class="video_plate_title"><h2> Возвращение </h2></div>
            <span itemprop="name">Смотреть Наруто 1 сезон 3 серия</span>
            <video><source src="https://r.example/720.mp4" type="video/mp4"><source src="https://r.example/480.mp4"></video>
        "#;
        let episode = parse_episode_page(html, "Наруто").expect("episode should parse");
        assert_eq!(episode.title, "Возвращение");
        assert_eq!(episode.video_url, "https://r.example/720.mp4");
    }

    #[test]
    fn episode_page_falls_back_to_item_name() {
        let html = r#"
            <span itemprop="name">Смотреть Наруто 1 сезон 3 серия</span>
            <source src="https://r.example/720.mp4">
        "#;
        let episode = parse_episode_page(html, "Наруто").expect("episode should parse");
        assert_eq!(episode.title, "1 сезон 3 серия");
    }

    #[test]
    fn episode_page_without_video_is_an_error() {
        let html = r#"<div class="video_plate_title"><h2>x</h2></div>"#;
        let err = parse_episode_page(html, "Наруто").expect_err("no source");
        assert_eq!(err.to_string(), "missing video source on episode page");
    }

    #[test]
    fn episode_page_without_any_title_is_an_error() {
        let html = r#"
            <div class="video_plate_title"><p>no heading</p></div>
            <span itemprop="description">Смотреть Наруто</span>
            <source src="https://r.example/720.mp4">
        "#;
        let err = parse_episode_page(html, "Наруто").expect_err("no title");
        assert!(matches!(
            err,
            CoreError::MissingElement {
                page: "episode",
                element: "episode title"
            }
        ));
    }

    #[test]
    fn episode_file_name_is_sanitized() {
        assert_eq!(
            episode_file_name(7, "Who: are you?"),
            "[#7] Who are you.mp4"
        );
    }

    #[test]
    fn absolute_url_handles_relative_and_absolute_links() {
        assert_eq!(absolute_url("https://jut.su/", "/a.html"), "https://jut.su/a.html");
        assert_eq!(absolute_url("https://jut.su", "a.html"), "https://jut.su/a.html");
        assert_eq!(
            absolute_url("https://jut.su", "https://cdn.jut.su/a.html"),
            "https://cdn.jut.su/a.html"
        );
    }
}
