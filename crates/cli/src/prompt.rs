use std::num::ParseIntError;

use inquire::Text;
use jutsu::prelude::*;

use crate::args::*;

pub fn prompt_for_url(initial: Option<&str>) -> Result<String> {
    Text::new("show:")
        .with_help_message("jut.su show url or slug (e.g. https://jut.su/baki/)")
        .with_initial_value(initial.unwrap_or_default())
        .prompt()
        .map_err(|err| JutsuError::Message(format!("failed to read show URL: {err}")))
}

/// which answers still need a prompt. a flag answers its own prompt unless
/// `--interactive` asks to review it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptPlan {
    pub url: bool,
    pub season_from: bool,
    pub episode_from: bool,
    pub season_to: bool,
    pub episode_to: bool,
}

impl PromptPlan {
    pub fn new(args: &DownloadArgs) -> Self {
        let interactive = args.list.app_args.interactive;
        let ask = |given: bool| interactive || !given;
        let range = &args.range;

        Self {
            url: ask(args.list.url.is_some()),
            season_from: ask(range.season_from.is_some()),
            episode_from: ask(range.episode_from.is_some()),
            season_to: ask(range.season_to.is_some()),
            episode_to: ask(range.episode_to.is_some()),
        }
    }
}

pub fn prompt_for_args(args: &DownloadArgs) -> Result<RuntimeArgs> {
    let plan = PromptPlan::new(args);
    let range = &args.range;

    let url = match &args.list.url {
        Some(url) if !plan.url => url.clone(),
        url => prompt_for_url(url.as_deref())?,
    };

    let season_from = ask_bound(
        plan.season_from,
        "season from:",
        "leave empty to start from the first season",
        range.season_from,
    )?;

    let episode_from = ask_bound(
        plan.episode_from,
        &format!("episode of season {} to start from:", season_from.unwrap_or(1)),
        "leave empty to start from the first episode",
        range.episode_from,
    )?;

    let season_to = ask_bound(
        plan.season_to,
        "season to:",
        "leave empty to download up to the last season",
        range.season_to,
    )?;

    let episode_to = ask_bound(
        plan.episode_to,
        "episode of that season to stop at:",
        "leave empty to download up to the last episode",
        range.episode_to,
    )?;

    let answered = RangeArgs {
        season_from,
        episode_from,
        season_to,
        episode_to,
    };
    Ok(RuntimeArgs::new(url, answered.selector()?))
}

fn ask_bound(ask: bool, message: &str, help: &str, flag: Option<u32>) -> Result<Option<u32>> {
    if ask {
        prompt_bound(message, help, flag)
    } else {
        Ok(flag)
    }
}

fn prompt_bound(message: &str, help: &str, initial: Option<u32>) -> Result<Option<u32>> {
    let initial = initial.map(|value| value.to_string()).unwrap_or_default();
    let input = Text::new(message)
        .with_help_message(help)
        .with_initial_value(&initial)
        .prompt()
        .map_err(|err| JutsuError::Message(format!("failed to read {message} {err}")))?;

    parse_bound(&input).map_err(|_| {
        JutsuError::Message(format!("{} must be a number, got {input:?}", message.trim_end_matches(':')))
    })
}

/// empty input means "use the default".
pub fn parse_bound(input: &str) -> std::result::Result<Option<u32>, ParseIntError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input.parse().map(Some)
}
