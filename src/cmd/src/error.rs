use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Cluster(#[from] kreg_cluster::error::Error),

    #[error("failed to serialize cluster: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to serialize cluster: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
