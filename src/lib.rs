pub mod builder;
pub mod client;
pub mod errors;
pub mod pipeline;

pub use builder::*;
pub use client::*;
pub use errors::*;
pub use pipeline::*;

pub mod prelude {
    pub use crate::builder::JutsuBuilder;
    pub use crate::client::JutsuClient;
    pub use crate::errors::{JutsuError, Result};
    pub use crate::pipeline::{
        Catalog, DownloadTarget, Pipeline, PipelineEvent, RunSummary, VideoFetcher,
    };
    pub use jutsu_core::{Anime, EpisodePage, RangeSelector, Season, sanitize};
}
