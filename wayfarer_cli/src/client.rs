use std::time::Duration;

use clap::Args;
use tracing::debug;
use wayfarer_matrix_providers::{
    cache::FileCache, config::RoutingClientParams, routing_client::RoutingClient,
    waypoint::RoutingProfile,
};

use crate::parsers;

#[derive(Args)]
pub struct RoutingArgs {
    /// Routing profile, overrides the one of the input file
    #[arg(short, long)]
    pub profile: Option<RoutingProfile>,

    /// Timeout of a single routing request (e.g., "30s", "2m", "PT1M")
    #[arg(long, value_parser = parsers::parse_timeout)]
    pub timeout: Option<Duration>,
}

impl RoutingArgs {
    pub fn profile_or(&self, profile: RoutingProfile) -> RoutingProfile {
        self.profile.unwrap_or(profile)
    }

    /// Client configured from the environment. Matrices are cached on disk when
    /// `WAYFARER_CACHE_FOLDER` points to an existing folder.
    pub fn client(&self) -> Result<RoutingClient<Option<FileCache>>, anyhow::Error> {
        let mut params = RoutingClientParams::from_env()?;
        if let Some(timeout) = self.timeout {
            params.timeout = timeout;
        }

        let cache = match FileCache::from_env() {
            Ok(cache) => {
                debug!("Caching matrices in {:?}", cache.folder());
                Some(cache)
            }
            Err(error) => {
                debug!("Matrix cache disabled: {}", error);
                None
            }
        };

        Ok(RoutingClient::new(params)?.with_cache(cache))
    }
}
