use std::sync::LazyLock;

use regex::Regex;

pub const JUTSU_DOMAIN: &str = "jut.su";

pub const DEFAULT_OUTPUT_DIR: &str = "Downloads";

pub static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("slug regex must compile"));

pub static SHOW_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        format!(
            r"^(?:https?://)?(?:www\.)?{}/([A-Za-z0-9_-]+)(?:[/?#].*)?$",
            regex::escape(JUTSU_DOMAIN)
        )
        .as_str(),
    )
    .expect("show link regex must compile")
});
