pub mod errors;
pub mod html;
pub mod page;
pub mod range;
pub mod sanitize;
pub mod season;

pub use errors::{CoreError, Result};
pub use page::{Anime, EpisodePage, episode_file_name, parse_anime_page, parse_episode_page};
pub use range::{RangeSelector, should_download};
pub use sanitize::sanitize;
pub use season::{EpisodeLink, Season, count_marker_groups, group_episodes};
