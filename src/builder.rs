use std::time::Duration;

use crate::prelude::*;

const BASE_DOMAIN: &str = "jut.su";
const USER_AGENT: &str = "ScraperBot/1.0";
const REQUEST_DELAY: Duration = Duration::from_secs(1);

pub struct JutsuBuilder {
    base_url: String,
    user_agent: String,
    delay: Duration,
}

impl Default for JutsuBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JutsuBuilder {
    /// creates a builder pointing at jut.su with the default user agent and delay.
    pub fn new() -> Self {
        Self {
            base_url: format!("https://{BASE_DOMAIN}"),
            user_agent: USER_AGENT.to_string(),
            delay: REQUEST_DELAY,
        }
    }

    /// sets the full site origin, scheme included.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// replaces the `ScraperBot/1.0` user agent sent with every request.
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// sets the minimum pause between two consecutive requests.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// builds a [`JutsuClient`] using the configured options.
    pub fn build(&self) -> Result<JutsuClient> {
        JutsuClient::new(self.base_url.clone(), &self.user_agent, self.delay)
    }
}
