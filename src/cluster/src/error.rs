use std::path::PathBuf;

use kube::config::KubeconfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load kubeconfig: {0}")]
    Kubeconfig(#[from] KubeconfigError),

    #[error("no current context is set in kubeconfig")]
    NoCurrentContext,

    #[error("context {0} is not found in kubeconfig")]
    ContextNotFound(String),

    #[error("cluster {0} is not found in kubeconfig")]
    ClusterNotFound(String),

    #[error("failed to decode {field}: {source}")]
    Decode {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output: {0}")]
    Write(#[source] std::io::Error),

    #[error("invalid proxy url: {0}")]
    InvalidProxyUrl(String),

    #[error(transparent)]
    Kube(#[from] kube::Error),

    #[error("cluster-info does not contain a public kubeconfig")]
    MissingPublicKubeconfig,

    #[error("failed to parse cluster-info kubeconfig: {0}")]
    ParsePublicKubeconfig(#[source] KubeconfigError),

    #[error("cluster-info kubeconfig does not have any clusters")]
    NoPublicCluster,

    #[error("invalid cluster endpoint: {0}")]
    InvalidClusterEndpoint(String),

    #[error("invalid KEY=VALUE pair: no `=` found in `{0}`")]
    InvalidKeyValue(String),
}
