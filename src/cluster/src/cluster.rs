use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{codec::base64_bytes, error::Error, rest_config::RestConfig};

/// A cluster registered with the GitOps controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub server: String,
    pub name: String,
    pub config: ClusterConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cluster_resources: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard: Option<i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bearer_token: String,
    pub tls_client_config: TlsClientConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_auth_config: Option<AwsAuthConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_provider_config: Option<ExecProviderConfig>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disable_compression: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub proxy_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsClientConfig {
    pub insecure: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server_name: String,
    #[serde(default, with = "base64_bytes", skip_serializing_if = "Vec::is_empty")]
    pub ca_data: Vec<u8>,
    #[serde(default, with = "base64_bytes", skip_serializing_if = "Vec::is_empty")]
    pub cert_data: Vec<u8>,
    #[serde(default, with = "base64_bytes", skip_serializing_if = "Vec::is_empty")]
    pub key_data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsAuthConfig {
    pub cluster_name: String,
    #[serde(rename = "roleARN", default, skip_serializing_if = "String::is_empty")]
    pub role_arn: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub profile: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecProviderConfig {
    pub command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub install_hint: String,
}

impl TlsClientConfig {
    pub fn has_client_cert(&self) -> bool {
        !self.cert_data.is_empty() && !self.key_data.is_empty()
    }
}

/// Builds the cluster descriptor for `conf`.
///
/// TLS material missing inline is read from its file path. A proxy resolver
/// that fails is ignored. `manager_bearer_token` is only set when the client
/// certificate or key is missing, so complete certificate auth is never
/// shadowed by a token.
#[allow(clippy::too_many_arguments)]
pub fn new_cluster(
    name: &str,
    namespaces: Vec<String>,
    cluster_resources: bool,
    conf: &RestConfig,
    manager_bearer_token: &str,
    aws_auth_config: Option<AwsAuthConfig>,
    exec_provider_config: Option<ExecProviderConfig>,
    labels: BTreeMap<String, String>,
    annotations: BTreeMap<String, String>,
) -> Result<Cluster, Error> {
    let tls_client_config = TlsClientConfig {
        insecure: conf.insecure,
        server_name: conf.server_name.clone(),
        ca_data: resolve_data(&conf.ca_data, conf.ca_file.as_deref())?,
        cert_data: resolve_data(&conf.cert_data, conf.cert_file.as_deref())?,
        key_data: resolve_data(&conf.key_data, conf.key_file.as_deref())?,
    };

    let mut cluster = Cluster {
        server: conf.host.clone(),
        name: name.to_string(),
        namespaces,
        cluster_resources,
        config: ClusterConfig {
            tls_client_config,
            aws_auth_config,
            exec_provider_config,
            disable_compression: conf.disable_compression,
            ..Default::default()
        },
        labels,
        annotations,
        ..Default::default()
    };

    if let Some(proxy) = &conf.proxy {
        match proxy(None) {
            Ok(url) => cluster.config.proxy_url = url,
            Err(e) => tracing::debug!(error = %e, "ignore proxy resolution failure"),
        }
    }

    if !cluster.config.tls_client_config.has_client_cert() {
        cluster.config.bearer_token = manager_bearer_token.to_string();
    }

    tracing::debug!(name = %cluster.name, server = %cluster.server, "built cluster");
    Ok(cluster)
}

fn resolve_data(data: &[u8], file: Option<&Path>) -> Result<Vec<u8>, Error> {
    match file {
        Some(path) if data.is_empty() => std::fs::read(path).map_err(|source| Error::ReadFile {
            path: PathBuf::from(path),
            source,
        }),
        _ => Ok(data.to_vec()),
    }
}
