use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use kreg_cluster::{
    cluster::{new_cluster, Cluster},
    endpoint::{client_for_context, get_kube_public_endpoint, KUBE_INTERNAL_HOST},
    kubeconfig::{ConfigAccess, PathOptions},
    options::{parse_key_val, ClusterEndpoint, ClusterOptions},
    rest_config::RestConfig,
    util::check_error,
};
use kube::config::Kubeconfig;

use crate::error::Error;

#[derive(Debug, Clone, Parser)]
pub struct AddCmd {
    #[arg(help = "Name of the kubeconfig context to register")]
    pub context: String,

    #[arg(long, help = "Path to the kubeconfig file")]
    pub kubeconfig: Option<PathBuf>,

    #[arg(
        long = "bearer-token",
        help = "Bearer token used when the context has no client certificate"
    )]
    pub bearer_token: Option<String>,

    #[arg(
        long = "label",
        value_parser = parse_key_val,
        action = ArgAction::Append,
        help = "Set metadata labels (e.g. --label key=value)"
    )]
    pub labels: Vec<(String, String)>,

    #[arg(
        long = "annotation",
        value_parser = parse_key_val,
        action = ArgAction::Append,
        help = "Set metadata annotations (e.g. --annotation key=value)"
    )]
    pub annotations: Vec<(String, String)>,

    #[arg(
        value_enum,
        short = 'o',
        long,
        default_value = "yaml",
        help = "Output format"
    )]
    pub output: Output,

    #[command(flatten)]
    pub cluster: ClusterOptions,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Output {
    Json,
    Yaml,
}

pub fn run(a: AddCmd) {
    let kubeconfig = check_error(PathOptions::new(a.kubeconfig.clone()).starting_config());
    let runtime = check_error(
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime),
    );
    let cluster = check_error(runtime.block_on(build_cluster(&a, kubeconfig)));
    println!("{}", check_error(render(&cluster, &a.output)));
}

#[tracing::instrument(skip_all, fields(context = %a.context))]
pub async fn build_cluster(a: &AddCmd, kubeconfig: Kubeconfig) -> Result<Cluster, Error> {
    let opts = &a.cluster;
    let endpoint = opts.endpoint()?;

    let mut conf = RestConfig::from_kubeconfig(&kubeconfig, Some(&a.context))?;
    conf.disable_compression = opts.disable_compression;

    if opts.in_cluster_endpoint() {
        tracing::info!(host = KUBE_INTERNAL_HOST, "use in-cluster endpoint");
        conf.host = KUBE_INTERNAL_HOST.to_string();
    } else if endpoint == Some(ClusterEndpoint::KubePublic) {
        let client = client_for_context(kubeconfig, &a.context).await?;
        let (host, ca_data) = get_kube_public_endpoint(client).await?;
        conf.host = host;
        conf.ca_data = ca_data;
        conf.ca_file = None;
    }

    let name = if opts.name.is_empty() {
        a.context.clone()
    } else {
        opts.name.clone()
    };

    let mut cluster = new_cluster(
        &name,
        opts.namespaces.clone(),
        opts.cluster_resources,
        &conf,
        a.bearer_token.as_deref().unwrap_or_default(),
        opts.aws_auth_config(),
        opts.exec_provider_config(),
        a.labels.iter().cloned().collect(),
        a.annotations.iter().cloned().collect(),
    )?;
    cluster.project = opts.project.clone();
    cluster.shard = opts.shard_number();

    Ok(cluster)
}

pub fn render(cluster: &Cluster, output: &Output) -> Result<String, Error> {
    let out = match output {
        Output::Json => serde_json::to_string_pretty(cluster)?,
        Output::Yaml => serde_yaml::to_string(cluster)?,
    };
    Ok(out)
}
