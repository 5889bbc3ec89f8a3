use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use travel_server::cache::{CacheConfig, CachedCosts};
use travel_server::config::{AppConfig, Backend, ConfigError};
use travel_server::costs::{CostClient, CostError, CostLookup, FixedCosts};
use travel_server::domain::Direction;
use travel_server::dto::{SearchRequest, SearchResponse};
use travel_server::itinerary::{Aggregator, SearchQuery};
use travel_server::places::{
    Geocoder, InMemoryPlaces, PlaceDirectory, PlaceError, StaticGeocoder, find_or_create,
};
use travel_server::providers::{
    AmadeusClient, GoogleMapsClient, ItinerarySource, LiveSource, ProviderError, RecordedSource,
};

const USAGE: &str = "usage: travel-server search <request.json>";

const DEFAULT_LOG: &str = "travel_server=info";

/// Log filter from `RUST_LOG`, or crate-level info when unset or invalid.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG))
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error("usage: travel-server search <request.json>")]
    Usage,

    #[error("failed to read request: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid request: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Place(#[from] PlaceError),

    #[error(transparent)]
    Cost(#[from] CostError),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunError::Usage) => {
            eprintln!("{USAGE}");
            ExitCode::from(2)
        }
        Err(e) => {
            error!(error = %e, "search failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String]) -> Result<(), RunError> {
    let path = match args {
        [command, path] if command == "search" => path,
        _ => return Err(RunError::Usage),
    };

    let request: SearchRequest = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    let config = AppConfig::from_env()?;
    let places = InMemoryPlaces::new();

    match config.backend()? {
        Backend::Recorded(dir) => {
            info!(dir = %dir.display(), "using recorded provider responses");
            let source = RecordedSource::load(&dir)?;
            let geocoder = StaticGeocoder::new(request.origin.country.clone());

            match config.cost_client() {
                Some(costs) => {
                    let costs = CachedCosts::new(CostClient::new(costs)?, &CacheConfig::default());
                    let aggregator =
                        Aggregator::new(source, geocoder, places, costs, config.search_config());
                    search(&aggregator, &request).await
                }
                None => {
                    let aggregator = Aggregator::new(
                        source,
                        geocoder,
                        places,
                        FixedCosts::default(),
                        config.search_config(),
                    );
                    search(&aggregator, &request).await
                }
            }
        }
        Backend::Live { maps, flights } => {
            info!("using live provider APIs");
            let maps = GoogleMapsClient::new(maps)?;
            let credentials = Arc::new(flights.credential_provider()?);
            let flights = AmadeusClient::new(&flights, credentials)?;
            let costs = CostClient::new(config.cost_client().unwrap_or_default())?;

            let aggregator = Aggregator::new(
                LiveSource::new(maps.clone(), flights),
                maps,
                places,
                CachedCosts::new(costs, &CacheConfig::default()),
                config.search_config(),
            );
            search(&aggregator, &request).await
        }
    }
}

/// Resolve the requested places, search both ways and print the options.
async fn search<S, G, D, C>(
    aggregator: &Aggregator<S, G, D, C>,
    request: &SearchRequest,
) -> Result<(), RunError>
where
    S: ItinerarySource,
    G: Geocoder,
    D: PlaceDirectory,
    C: CostLookup,
{
    let places = aggregator.places();
    let origin = find_or_create(
        places,
        &request.origin.name,
        request.origin.country.as_deref(),
        request.origin.location(),
    )
    .await?;
    let destination = find_or_create(
        places,
        &request.destination.name,
        request.destination.country.as_deref(),
        request.destination.location(),
    )
    .await?;

    let query = SearchQuery::new(origin, destination, request.departure, Direction::Outward);
    let (outward, inbound) = aggregator
        .search_round_trip(&query, request.return_departure)
        .await;

    info!(
        outward = outward.len(),
        inbound = inbound.len(),
        "search complete"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&SearchResponse::new(&outward, &inbound))?
    );
    Ok(())
}
