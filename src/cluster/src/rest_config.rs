use std::{fmt, path::PathBuf, sync::Arc};

use http::Uri;
use kube::config::Kubeconfig;
use secrecy::ExposeSecret;

use crate::{codec, error::Error, util::get_named};

/// Resolves the proxy URL for a target URL. Called with `None` to ask for the
/// default proxy. The URL is returned as configured.
pub type ProxyResolver = Arc<dyn Fn(Option<&Uri>) -> Result<String, Error> + Send + Sync>;

/// Connection parameters for a Kubernetes API server.
///
/// TLS material can be given inline or as a file path. Inline bytes win when
/// both are present.
#[derive(Clone, Default)]
pub struct RestConfig {
    pub host: String,
    pub insecure: bool,
    pub server_name: String,
    pub ca_data: Vec<u8>,
    pub ca_file: Option<PathBuf>,
    pub cert_data: Vec<u8>,
    pub cert_file: Option<PathBuf>,
    pub key_data: Vec<u8>,
    pub key_file: Option<PathBuf>,
    pub bearer_token: String,
    pub proxy: Option<ProxyResolver>,
    pub disable_compression: bool,
}

impl fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestConfig")
            .field("host", &self.host)
            .field("insecure", &self.insecure)
            .field("server_name", &self.server_name)
            .field("ca_data", &format_args!("{} bytes", self.ca_data.len()))
            .field("ca_file", &self.ca_file)
            .field("cert_data", &format_args!("{} bytes", self.cert_data.len()))
            .field("cert_file", &self.cert_file)
            .field("key_data", &"[REDACTED]")
            .field("key_file", &self.key_file)
            .field("bearer_token", &"[REDACTED]")
            .field("proxy", &self.proxy.is_some())
            .field("disable_compression", &self.disable_compression)
            .finish()
    }
}

impl RestConfig {
    /// Builds the connection parameters of `context`, or of the current
    /// context when `None`.
    pub fn from_kubeconfig(config: &Kubeconfig, context: Option<&str>) -> Result<Self, Error> {
        let context_name = match context {
            Some(name) => name,
            None => config
                .current_context
                .as_deref()
                .ok_or(Error::NoCurrentContext)?,
        };
        let context = get_named(&config.contexts, context_name, |c| c.name.as_str())
            .and_then(|c| c.context.as_ref())
            .ok_or_else(|| Error::ContextNotFound(context_name.to_string()))?;
        let cluster = get_named(&config.clusters, &context.cluster, |c| c.name.as_str())
            .and_then(|c| c.cluster.as_ref())
            .ok_or_else(|| Error::ClusterNotFound(context.cluster.clone()))?;
        let auth_info = get_named(&config.auth_infos, &context.user, |a| a.name.as_str())
            .and_then(|a| a.auth_info.as_ref());

        let mut rest = RestConfig {
            host: cluster.server.clone().unwrap_or_default(),
            insecure: cluster.insecure_skip_tls_verify.unwrap_or(false),
            server_name: cluster.tls_server_name.clone().unwrap_or_default(),
            ca_data: decode_field(
                "certificate-authority-data",
                cluster.certificate_authority_data.as_deref(),
            )?,
            ca_file: cluster.certificate_authority.as_ref().map(PathBuf::from),
            ..Default::default()
        };

        if let Some(auth_info) = auth_info {
            rest.cert_data = decode_field(
                "client-certificate-data",
                auth_info.client_certificate_data.as_deref(),
            )?;
            rest.cert_file = auth_info.client_certificate.as_ref().map(PathBuf::from);
            rest.key_data = decode_field(
                "client-key-data",
                auth_info
                    .client_key_data
                    .as_ref()
                    .map(|k| k.expose_secret().as_str()),
            )?;
            rest.key_file = auth_info.client_key.as_ref().map(PathBuf::from);
            rest.bearer_token = auth_info
                .token
                .as_ref()
                .map(|t| t.expose_secret().clone())
                .unwrap_or_default();
        }

        if let Some(proxy_url) = cluster.proxy_url.clone() {
            let resolver: ProxyResolver = Arc::new(move |_: Option<&Uri>| {
                proxy_url
                    .parse::<Uri>()
                    .map(|_| proxy_url.clone())
                    .map_err(|_| Error::InvalidProxyUrl(proxy_url.clone()))
            });
            rest.proxy = Some(resolver);
        }

        tracing::debug!(context = context_name, host = %rest.host, "resolved rest config");
        Ok(rest)
    }
}

fn decode_field(field: &'static str, data: Option<&str>) -> Result<Vec<u8>, Error> {
    match data {
        Some(data) => codec::decode(data.trim()).map_err(|source| Error::Decode { field, source }),
        None => Ok(Vec::new()),
    }
}
