use thiserror::Error;

/// Errors produced while loading snapshots or deriving features.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown region '{name}', supported regions: {supported}")]
    UnknownRegion { name: String, supported: String },
    #[error("road graph has no nodes, cannot derive a city center")]
    EmptyRoadGraph,
    #[error("{found} landmark candidates within {radius_m} m, need {wanted}")]
    InsufficientLandmarks {
        wanted: usize,
        found: usize,
        radius_m: f64,
    },
    #[error("invalid snapshot data: {0}")]
    InvalidSnapshot(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
