use k8s_openapi::api::core::v1::ConfigMap;
use kube::{
    config::{KubeConfigOptions, Kubeconfig},
    Api, Client,
};

use crate::{codec, error::Error};

pub const KUBE_PUBLIC_NAMESPACE: &str = "kube-public";
pub const CLUSTER_INFO: &str = "cluster-info";
pub const CLUSTER_INFO_KUBECONFIG_KEY: &str = "kubeconfig";

/// Address a workload uses to reach the API server of its own cluster.
pub const KUBE_INTERNAL_HOST: &str = "https://kubernetes.default.svc";

/// Returns the API server endpoint and certificate authority data published
/// in the `kube-public/cluster-info` config map.
#[tracing::instrument(skip_all)]
pub async fn get_kube_public_endpoint(client: Client) -> Result<(String, Vec<u8>), Error> {
    let config_maps = Api::<ConfigMap>::namespaced(client, KUBE_PUBLIC_NAMESPACE);
    let cluster_info = config_maps.get(CLUSTER_INFO).await?;

    let kubeconfig = cluster_info
        .data
        .as_ref()
        .and_then(|data| data.get(CLUSTER_INFO_KUBECONFIG_KEY))
        .ok_or(Error::MissingPublicKubeconfig)?;

    let config = Kubeconfig::from_yaml(kubeconfig).map_err(Error::ParsePublicKubeconfig)?;
    let cluster = config.clusters.first().ok_or(Error::NoPublicCluster)?;

    let (server, ca_data) = match &cluster.cluster {
        Some(c) => {
            let ca_data = match &c.certificate_authority_data {
                Some(data) => codec::decode(data.trim()).map_err(|source| Error::Decode {
                    field: "certificate-authority-data",
                    source,
                })?,
                None => Vec::new(),
            };
            (c.server.clone().unwrap_or_default(), ca_data)
        }
        None => (String::new(), Vec::new()),
    };

    tracing::info!(server = %server, "found public endpoint");
    Ok((server, ca_data))
}

/// Creates a client talking to the cluster of `context`.
pub async fn client_for_context(kubeconfig: Kubeconfig, context: &str) -> Result<Client, Error> {
    let options = KubeConfigOptions {
        context: Some(context.to_string()),
        ..Default::default()
    };
    let config = kube::Config::from_custom_kubeconfig(kubeconfig, &options).await?;
    Ok(Client::try_from(config)?)
}
