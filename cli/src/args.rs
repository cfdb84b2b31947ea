use std::path::PathBuf;

use clap::Parser;
use learnpath_retrieval::{DistanceMetric, Level, RetrievalConfig};

pub const DEFAULT_QUERY: &str = "How do I create a function in Python?";

#[derive(Parser, Debug, Clone)]
#[command(name = "learnpath")]
#[command(about = "Recommend a level-aware learning path for a question")]
pub struct Args {
    /// Learner skill level (beginner, intermediate, advanced)
    #[arg(long, env = "LEARNPATH_LEVEL", default_value = "beginner")]
    pub level: Level,

    /// Neighbors retrieved before level filtering; overrides the config file
    #[arg(long, env = "LEARNPATH_TOP_K")]
    pub top_k: Option<usize>,

    /// Distance metric (l2, cosine, inner_product); overrides the config file
    #[arg(long, env = "LEARNPATH_METRIC")]
    pub metric: Option<DistanceMetric>,

    /// TOML configuration file
    #[arg(long, env = "LEARNPATH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read queries from stdin, one per line
    #[arg(long, env = "LEARNPATH_INTERACTIVE")]
    pub interactive: bool,

    /// What the learner wants to learn about
    #[arg(default_value = DEFAULT_QUERY)]
    pub query: String,
}

impl Args {
    /// Load the config file, if any, and apply command-line overrides.
    pub fn retrieval_config(&self) -> anyhow::Result<RetrievalConfig> {
        let mut config = match &self.config {
            Some(path) => RetrievalConfig::load(path)?,
            None => RetrievalConfig::default(),
        };
        if let Some(top_k) = self.top_k {
            config = config.with_top_k(top_k);
        }
        if let Some(metric) = self.metric {
            config = config.with_metric(metric);
        }
        config.validate()?;
        Ok(config)
    }
}
