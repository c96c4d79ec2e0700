use std::{collections::BTreeMap, str::FromStr};

use clap::{ArgAction, Args, Command};

use crate::{
    cluster::{AwsAuthConfig, ExecProviderConfig},
    error::Error,
};

/// Where the registered cluster's API server address comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterEndpoint {
    KubeConfig,
    KubePublic,
    Internal,
}

impl std::fmt::Display for ClusterEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KubeConfig => write!(f, "kubeconfig"),
            Self::KubePublic => write!(f, "kube-public"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

impl FromStr for ClusterEndpoint {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kubeconfig" => Ok(ClusterEndpoint::KubeConfig),
            "kube-public" => Ok(ClusterEndpoint::KubePublic),
            "internal" => Ok(ClusterEndpoint::Internal),
            _ => Err(Error::InvalidClusterEndpoint(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct ClusterOptions {
    #[arg(
        long = "in-cluster",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        help = "Indicates the controller resides inside this cluster and should connect using the internal k8s hostname (kubernetes.default.svc)"
    )]
    pub in_cluster: bool,

    #[arg(skip)]
    pub upsert: bool,

    #[arg(skip)]
    pub service_account: String,

    #[arg(
        long = "aws-role-arn",
        default_value = "",
        help = "Optional AWS role arn. If set then AWS IAM Authenticator assumes a role to perform cluster operations instead of the default AWS credential provider chain."
    )]
    pub aws_role_arn: String,

    #[arg(
        long = "aws-profile",
        default_value = "",
        help = "Optional AWS profile. If set then AWS IAM Authenticator uses this profile to perform cluster operations instead of the default AWS credential provider chain."
    )]
    pub aws_profile: String,

    #[arg(
        long = "aws-cluster-name",
        default_value = "",
        help = "AWS Cluster name if set then aws cli eks token command will be used to access cluster"
    )]
    pub aws_cluster_name: String,

    #[arg(skip)]
    pub system_namespace: String,

    #[arg(
        long = "namespace",
        action = ArgAction::Append,
        help = "List of namespaces which are allowed to manage"
    )]
    pub namespaces: Vec<String>,

    #[arg(
        long = "cluster-resources",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        help = "Indicates if cluster level resources should be managed. The setting is used only if list of managed namespaces is not empty."
    )]
    pub cluster_resources: bool,

    #[arg(long, default_value = "", help = "Overwrite the cluster name")]
    pub name: String,

    #[arg(long, default_value = "", help = "project of the cluster")]
    pub project: String,

    #[arg(
        long,
        default_value_t = -1,
        allow_negative_numbers = true,
        help = "Cluster shard number; inferred from hostname if not set"
    )]
    pub shard: i64,

    #[arg(
        long = "exec-command",
        default_value = "",
        help = "Command to run to provide client credentials to the cluster"
    )]
    pub exec_provider_command: String,

    #[arg(
        long = "exec-command-args",
        action = ArgAction::Append,
        allow_hyphen_values = true,
        help = "Arguments to supply to the --exec-command executable"
    )]
    pub exec_provider_args: Vec<String>,

    #[arg(
        long = "exec-command-env",
        value_parser = parse_key_val,
        value_delimiter = ',',
        action = ArgAction::Append,
        help = "Environment vars to set when running the --exec-command executable (KEY=VALUE)"
    )]
    pub exec_provider_env: Vec<(String, String)>,

    #[arg(
        long = "exec-command-api-version",
        default_value = "",
        help = "Preferred input version of the ExecInfo for the --exec-command executable"
    )]
    pub exec_provider_api_version: String,

    #[arg(
        long = "exec-command-install-hint",
        default_value = "",
        help = "Text shown to the user when the --exec-command executable doesn't seem to be present"
    )]
    pub exec_provider_install_hint: String,

    #[arg(
        long = "cluster-endpoint",
        default_value = "",
        help = "Cluster endpoint to use. Can be one of the following: 'kubeconfig', 'kube-public', or 'internal'."
    )]
    pub cluster_endpoint: String,

    #[arg(
        long = "disable-compression",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        help = "Bypasses automatic GZip compression requests to the server"
    )]
    pub disable_compression: bool,

    #[arg(skip)]
    pub proxy_url: String,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        ClusterOptions {
            in_cluster: false,
            upsert: false,
            service_account: String::new(),
            aws_role_arn: String::new(),
            aws_profile: String::new(),
            aws_cluster_name: String::new(),
            system_namespace: String::new(),
            namespaces: Vec::new(),
            cluster_resources: false,
            name: String::new(),
            project: String::new(),
            shard: -1,
            exec_provider_command: String::new(),
            exec_provider_args: Vec::new(),
            exec_provider_env: Vec::new(),
            exec_provider_api_version: String::new(),
            exec_provider_install_hint: String::new(),
            cluster_endpoint: String::new(),
            disable_compression: false,
            proxy_url: String::new(),
        }
    }
}

impl ClusterOptions {
    /// Whether the cluster should be registered with the in-cluster endpoint.
    pub fn in_cluster_endpoint(&self) -> bool {
        self.in_cluster || self.cluster_endpoint == ClusterEndpoint::Internal.to_string()
    }

    pub fn endpoint(&self) -> Result<Option<ClusterEndpoint>, Error> {
        if self.cluster_endpoint.is_empty() {
            return Ok(None);
        }
        self.cluster_endpoint.parse().map(Some)
    }

    pub fn shard_number(&self) -> Option<i64> {
        (self.shard >= 0).then_some(self.shard)
    }

    pub fn exec_provider_env_map(&self) -> BTreeMap<String, String> {
        self.exec_provider_env.iter().cloned().collect()
    }

    pub fn aws_auth_config(&self) -> Option<AwsAuthConfig> {
        if self.aws_cluster_name.is_empty() {
            return None;
        }
        Some(AwsAuthConfig {
            cluster_name: self.aws_cluster_name.clone(),
            role_arn: self.aws_role_arn.clone(),
            profile: self.aws_profile.clone(),
        })
    }

    pub fn exec_provider_config(&self) -> Option<ExecProviderConfig> {
        if self.exec_provider_command.is_empty() {
            return None;
        }
        Some(ExecProviderConfig {
            command: self.exec_provider_command.clone(),
            args: self.exec_provider_args.clone(),
            env: self.exec_provider_env_map(),
            api_version: self.exec_provider_api_version.clone(),
            install_hint: self.exec_provider_install_hint.clone(),
        })
    }
}

/// Registers the cluster flags on `command`.
///
/// Read them back with [`clap::FromArgMatches::from_arg_matches`].
pub fn add_cluster_flags(command: Command) -> Command {
    ClusterOptions::augment_args(command)
}

pub fn parse_key_val(s: &str) -> Result<(String, String), Error> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| Error::InvalidKeyValue(s.to_string()))?;
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use clap::{Command, FromArgMatches};
    use rstest::rstest;

    use super::{add_cluster_flags, parse_key_val, ClusterEndpoint, ClusterOptions};
    use crate::{cluster::AwsAuthConfig, error::Error};

    fn parse(args: &[&str]) -> ClusterOptions {
        let command = add_cluster_flags(Command::new("add"));
        let matches = command
            .try_get_matches_from(std::iter::once("add").chain(args.iter().copied()))
            .unwrap();
        ClusterOptions::from_arg_matches(&matches).unwrap()
    }

    #[test]
    fn test_add_cluster_flags_defaults() {
        let opts = parse(&[]);
        assert_eq!(ClusterOptions::default(), opts);
        assert_eq!(-1, opts.shard);
        assert_eq!(None, opts.shard_number());
        assert!(!opts.in_cluster_endpoint());
        assert_eq!(None, opts.aws_auth_config());
        assert_eq!(None, opts.exec_provider_config());
    }

    #[test]
    fn test_add_cluster_flags() {
        let opts = parse(&[
            "--in-cluster",
            "--namespace",
            "default",
            "--namespace",
            "kube-system",
            "--cluster-resources",
            "--name",
            "prod",
            "--project",
            "platform",
            "--shard",
            "2",
            "--cluster-endpoint",
            "kube-public",
            "--disable-compression",
        ]);
        assert!(opts.in_cluster);
        assert_eq!(vec!["default", "kube-system"], opts.namespaces);
        assert!(opts.cluster_resources);
        assert_eq!("prod", opts.name);
        assert_eq!("platform", opts.project);
        assert_eq!(Some(2), opts.shard_number());
        assert_eq!(Some(ClusterEndpoint::KubePublic), opts.endpoint().unwrap());
        assert!(opts.disable_compression);
    }

    #[rstest(
        args,
        expected,
        case(vec!["--in-cluster"], (true, false, false)),
        case(vec!["--in-cluster=true", "--cluster-resources=true"], (true, true, false)),
        case(vec!["--in-cluster=false", "--disable-compression"], (false, false, true)),
        case(vec!["--disable-compression=false"], (false, false, false)),
    )]
    fn test_add_cluster_flags_bool_values(args: Vec<&str>, expected: (bool, bool, bool)) {
        let opts = parse(&args);
        assert_eq!(
            expected,
            (opts.in_cluster, opts.cluster_resources, opts.disable_compression)
        );
    }

    #[test]
    fn test_add_cluster_flags_invalid_bool() {
        let command = add_cluster_flags(Command::new("add"));
        let res = command.try_get_matches_from(["add", "--in-cluster=maybe"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_add_cluster_flags_exec_provider() {
        let opts = parse(&[
            "--exec-command",
            "get-token",
            "--exec-command-args",
            "--cluster",
            "--exec-command-args",
            "prod",
            "--exec-command-env",
            "A=1,B=2",
            "--exec-command-env",
            "C=x=y",
            "--exec-command-api-version",
            "client.authentication.k8s.io/v1",
            "--exec-command-install-hint",
            "install get-token",
        ]);
        let exec = opts.exec_provider_config().expect("exec provider config");
        assert_eq!("get-token", exec.command);
        assert_eq!(vec!["--cluster", "prod"], exec.args);
        assert_eq!(
            BTreeMap::from([
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "2".to_string()),
                ("C".to_string(), "x=y".to_string()),
            ]),
            exec.env
        );
        assert_eq!("client.authentication.k8s.io/v1", exec.api_version);
        assert_eq!("install get-token", exec.install_hint);
    }

    #[test]
    fn test_add_cluster_flags_aws() {
        let opts = parse(&[
            "--aws-cluster-name",
            "eks",
            "--aws-role-arn",
            "arn:aws:iam::123456789012:role/test",
            "--aws-profile",
            "dev",
        ]);
        assert_eq!(
            Some(AwsAuthConfig {
                cluster_name: "eks".to_string(),
                role_arn: "arn:aws:iam::123456789012:role/test".to_string(),
                profile: "dev".to_string(),
            }),
            opts.aws_auth_config()
        );
    }

    #[test]
    fn test_add_cluster_flags_invalid_env() {
        let command = add_cluster_flags(Command::new("add"));
        let res = command.try_get_matches_from(["add", "--exec-command-env", "novalue"]);
        assert!(res.is_err());
    }

    #[rstest(
        in_cluster,
        cluster_endpoint,
        expected,
        case(false, "", false),
        case(true, "", true),
        case(false, "internal", true),
        case(true, "internal", true),
        case(false, "kubeconfig", false),
        case(false, "kube-public", false),
        case(true, "kube-public", true),
        case(false, "Internal", false),
    )]
    fn test_in_cluster_endpoint(in_cluster: bool, cluster_endpoint: &str, expected: bool) {
        let opts = ClusterOptions {
            in_cluster,
            cluster_endpoint: cluster_endpoint.to_string(),
            ..Default::default()
        };
        assert_eq!(expected, opts.in_cluster_endpoint());
    }

    #[rstest(
        s,
        expected,
        case("kubeconfig", Some(ClusterEndpoint::KubeConfig)),
        case("kube-public", Some(ClusterEndpoint::KubePublic)),
        case("internal", Some(ClusterEndpoint::Internal)),
        case("public", None),
    )]
    fn test_cluster_endpoint_from_str(s: &str, expected: Option<ClusterEndpoint>) {
        let res = s.parse::<ClusterEndpoint>().ok();
        assert_eq!(expected, res);
        if let Some(endpoint) = res {
            assert_eq!(s, endpoint.to_string());
        }
    }

    #[test]
    fn test_endpoint_invalid() {
        let opts = ClusterOptions {
            cluster_endpoint: "public".to_string(),
            ..Default::default()
        };
        assert!(matches!(opts.endpoint(), Err(Error::InvalidClusterEndpoint(_))));
    }

    #[rstest(
        s,
        expected,
        case("a=b", Some(("a", "b"))),
        case("a=", Some(("a", ""))),
        case("a=b=c", Some(("a", "b=c"))),
        case("ab", None),
    )]
    fn test_parse_key_val(s: &str, expected: Option<(&str, &str)>) {
        let res = parse_key_val(s).ok();
        let expected = expected.map(|(k, v)| (k.to_string(), v.to_string()));
        assert_eq!(expected, res);
    }
}
