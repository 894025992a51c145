use tracing::warn;

/// a titled, ordered group of episode urls as shown on the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    pub title: String,
    pub episodes: Vec<String>,
}

impl Season {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            episodes: Vec::new(),
        }
    }
}

/// raw episode link paired with the marker used to detect season boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeLink {
    pub url: String,
    pub marker: String,
}

impl EpisodeLink {
    pub fn new(url: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            marker: marker.into(),
        }
    }
}

/// counts the contiguous runs of equal markers in `links`.
pub fn count_marker_groups(links: &[EpisodeLink]) -> usize {
    links
        .iter()
        .fold((None::<&str>, 0usize), |(previous, groups), link| {
            if previous == Some(link.marker.as_str()) {
                (previous, groups)
            } else {
                (Some(link.marker.as_str()), groups + 1)
            }
        })
        .1
}

/// partitions `links` into seasons by marker changes.
///
/// a link whose marker differs from the previous link's marker opens the next
/// season. with no `season_titles` a single season titled `anime_title` takes
/// every link. groups beyond the last title are folded into the last season.
pub fn group_episodes(
    links: Vec<EpisodeLink>,
    season_titles: Vec<String>,
    anime_title: &str,
) -> Vec<Season> {
    let seasons: Vec<Season> = if season_titles.is_empty() {
        vec![Season::new(anime_title)]
    } else {
        season_titles.into_iter().map(Season::new).collect()
    };

    let groups = count_marker_groups(&links);
    if groups > seasons.len() {
        warn!(
            groups,
            seasons = seasons.len(),
            "more episode groups than seasons; extra groups go to the last season"
        );
    }

    let last = seasons.len() - 1;
    let (seasons, _) = links.into_iter().fold(
        (seasons, None::<(String, usize)>),
        |(mut seasons, state), link| {
            let (marker, index) = match state {
                Some((marker, index)) if marker == link.marker => (marker, index),
                Some((_, index)) => (link.marker, index + 1),
                None => (link.marker, 0),
            };
            seasons[index.min(last)].episodes.push(link.url);
            (seasons, Some((marker, index)))
        },
    );

    seasons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(markers: &[&str]) -> Vec<EpisodeLink> {
        markers
            .iter()
            .enumerate()
            .map(|(i, marker)| EpisodeLink::new(format!("/ep-{}.html", i + 1), *marker))
            .collect()
    }

    fn titles(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn splits_on_marker_change() {
        let seasons = group_episodes(links(&["a", "a", "b", "b", "b"]), titles(&["S1", "S2"]), "Show");
        assert_eq!(seasons.len(), 2);
        assert_eq!(seasons[0].title, "S1");
        assert_eq!(seasons[0].episodes, vec!["/ep-1.html", "/ep-2.html"]);
        assert_eq!(seasons[1].episodes, vec!["/ep-3.html", "/ep-4.html", "/ep-5.html"]);
    }

    #[test]
    fn alternating_markers_only_need_to_differ_from_neighbour() {
        let seasons = group_episodes(
            links(&["black", "green", "green", "black"]),
            titles(&["S1", "S2", "S3"]),
            "Show",
        );
        assert_eq!(seasons[0].episodes.len(), 1);
        assert_eq!(seasons[1].episodes.len(), 2);
        assert_eq!(seasons[2].episodes, vec!["/ep-4.html"]);
    }

    #[test]
    fn extra_groups_are_clamped_into_last_season() {
        let input = links(&["A", "A", "A", "B", "B", "C"]);
        assert_eq!(count_marker_groups(&input), 3);

        let seasons = group_episodes(input, titles(&["S1", "S2"]), "Show");
        assert_eq!(seasons.len(), 2);
        assert_eq!(seasons[0].episodes.len(), 3);
        assert_eq!(
            seasons[1].episodes,
            vec!["/ep-4.html", "/ep-5.html", "/ep-6.html"]
        );
    }

    #[test]
    fn without_titles_everything_lands_in_one_season() {
        let seasons = group_episodes(links(&["x", "y", "x", "z"]), Vec::new(), "Baki");
        assert_eq!(seasons.len(), 1);
        assert_eq!(seasons[0].title, "Baki");
        assert_eq!(
            seasons[0].episodes,
            vec!["/ep-1.html", "/ep-2.html", "/ep-3.html", "/ep-4.html"]
        );
    }

    #[test]
    fn missing_groups_leave_trailing_seasons_empty() {
        let seasons = group_episodes(links(&["a", "a"]), titles(&["S1", "S2"]), "Show");
        assert_eq!(seasons[0].episodes.len(), 2);
        assert!(seasons[1].episodes.is_empty());
    }

    #[test]
    fn no_links_yields_empty_seasons() {
        assert_eq!(count_marker_groups(&[]), 0);
        let seasons = group_episodes(Vec::new(), titles(&["S1"]), "Show");
        assert_eq!(seasons, vec![Season::new("S1")]);
    }
}
