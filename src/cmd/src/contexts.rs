use std::path::PathBuf;

use clap::Parser;
use kreg_cluster::kubeconfig::{print_kube_contexts, PathOptions};

#[derive(Debug, Clone, Parser)]
pub struct ContextsCmd {
    #[arg(long, help = "Path to the kubeconfig file")]
    pub kubeconfig: Option<PathBuf>,
}

pub fn run(c: ContextsCmd) {
    print_kube_contexts(&PathOptions::new(c.kubeconfig));
}
