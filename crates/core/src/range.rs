use std::fmt;

use crate::errors::{CoreError, Result};

/// inclusive season/episode bounds chosen by the operator.
///
/// `None` on either upper bound means "until the end".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSelector {
    pub season_from: u32,
    pub episode_from: u32,
    pub season_to: Option<u32>,
    pub episode_to: Option<u32>,
}

impl Default for RangeSelector {
    fn default() -> Self {
        Self {
            season_from: 1,
            episode_from: 1,
            season_to: None,
            episode_to: None,
        }
    }
}

impl RangeSelector {
    pub fn new(
        season_from: u32,
        episode_from: u32,
        season_to: Option<u32>,
        episode_to: Option<u32>,
    ) -> Result<Self> {
        if season_from == 0 || episode_from == 0 {
            return Err(CoreError::InvalidRange {
                reason: "seasons and episodes are numbered from 1".to_string(),
            });
        }

        if let Some(to) = season_to
            && to < season_from
        {
            return Err(CoreError::InvalidRange {
                reason: format!("season-to {to} is before season-from {season_from}"),
            });
        }

        Ok(Self {
            season_from,
            episode_from,
            season_to,
            episode_to,
        })
    }

    /// whether any episode of `season` can be selected at all.
    pub fn includes_season(&self, season: u32) -> bool {
        season >= self.season_from && self.season_to.is_none_or(|to| season <= to)
    }

    /// decides whether episode `episode` of season `season` should be downloaded.
    ///
    /// the upper episode bound applies to the `season_to` season and also to the
    /// last season of the show, since that one is where an unbounded `season_to`
    /// actually ends.
    pub fn should_download(&self, season: u32, episode: u32, total_seasons: u32) -> bool {
        if !self.includes_season(season) {
            return false;
        }

        if season == self.season_from && episode < self.episode_from {
            return false;
        }

        let is_last = self.season_to == Some(season) || season == total_seasons;
        if is_last && self.episode_to.is_some_and(|to| episode > to) {
            return false;
        }

        true
    }
}

/// free-function form of [`RangeSelector::should_download`].
pub fn should_download(
    season: u32,
    episode: u32,
    total_seasons: u32,
    selector: &RangeSelector,
) -> bool {
    selector.should_download(season, episode, total_seasons)
}

impl fmt::Display for RangeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |value: Option<u32>| value.map_or_else(|| "end".to_string(), |v| v.to_string());
        write!(
            f,
            "{}:{} to {}:{}",
            self.season_from,
            self.episode_from,
            bound(self.season_to),
            bound(self.episode_to)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(sf: u32, ef: u32, st: Option<u32>, et: Option<u32>) -> RangeSelector {
        RangeSelector::new(sf, ef, st, et).expect("selector should be valid")
    }

    #[test]
    fn default_selects_everything() {
        let all = RangeSelector::default();
        assert!(should_download(1, 1, 3, &all));
        assert!(should_download(3, 250, 3, &all));
    }

    #[test]
    fn excludes_seasons_before_season_from() {
        assert!(!should_download(1, 1, 1, &selector(2, 1, None, None)));
    }

    #[test]
    fn cuts_episodes_after_episode_to_in_last_season() {
        let range = selector(1, 1, Some(2), Some(3));
        assert!(!should_download(2, 5, 2, &range));
        assert!(should_download(2, 3, 2, &range));
    }

    #[test]
    fn skips_episodes_before_episode_from_only_in_first_season() {
        let range = selector(2, 4, None, None);
        assert!(!should_download(2, 3, 5, &range));
        assert!(should_download(2, 4, 5, &range));
        assert!(should_download(3, 1, 5, &range));
    }

    #[test]
    fn episode_to_applies_to_real_last_season_when_unbounded() {
        let range = selector(1, 1, None, Some(10));
        assert!(should_download(1, 24, 3, &range));
        assert!(!should_download(3, 11, 3, &range));
    }

    #[test]
    fn episode_to_applies_to_both_season_to_and_last_season() {
        let range = selector(1, 1, Some(2), Some(3));
        assert!(!should_download(2, 4, 5, &range));
        assert!(should_download(1, 12, 5, &range));
        assert!(!should_download(3, 1, 5, &range));
    }

    #[test]
    fn rejects_zero_and_inverted_bounds() {
        assert!(RangeSelector::new(0, 1, None, None).is_err());
        assert!(RangeSelector::new(1, 0, None, None).is_err());
        let err = RangeSelector::new(3, 1, Some(2), None).expect_err("inverted range");
        assert!(err.to_string().contains("season-to 2 is before season-from 3"));
    }

    #[test]
    fn includes_season_honours_both_bounds() {
        let range = selector(2, 1, Some(3), None);
        assert!(!range.includes_season(1));
        assert!(range.includes_season(2));
        assert!(range.includes_season(3));
        assert!(!range.includes_season(4));
    }

    #[test]
    fn displays_unbounded_ends() {
        assert_eq!(RangeSelector::default().to_string(), "1:1 to end:end");
    }
}
