use std::{io::Write, path::PathBuf};

use kube::config::Kubeconfig;
use tabled::{
    settings::{object::Segment, Padding, Style},
    Table, Tabled,
};

use crate::{error::Error, util::check_error, util::get_named};

/// Source of the kubeconfig that commands start from.
pub trait ConfigAccess {
    fn starting_config(&self) -> Result<Kubeconfig, Error>;
}

/// Loads the kubeconfig from an explicit path, or from `KUBECONFIG` and
/// `~/.kube/config` when no path is given.
#[derive(Debug, Clone, Default)]
pub struct PathOptions {
    pub explicit_path: Option<PathBuf>,
}

impl PathOptions {
    pub fn new(explicit_path: Option<PathBuf>) -> Self {
        PathOptions { explicit_path }
    }
}

impl ConfigAccess for PathOptions {
    fn starting_config(&self) -> Result<Kubeconfig, Error> {
        let config = match &self.explicit_path {
            Some(path) => Kubeconfig::read_from(path)?,
            None => Kubeconfig::read()?,
        };
        tracing::debug!(contexts = config.contexts.len(), "loaded kubeconfig");
        Ok(config)
    }
}

impl ConfigAccess for Kubeconfig {
    fn starting_config(&self) -> Result<Kubeconfig, Error> {
        Ok(self.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct KubeContextRow {
    #[tabled(rename = "CURRENT", display_with = "current_marker")]
    pub current: bool,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "CLUSTER")]
    pub cluster: String,
    #[tabled(rename = "SERVER")]
    pub server: String,
}

fn current_marker(current: &bool) -> String {
    if *current {
        "*".to_string()
    } else {
        " ".to_string()
    }
}

/// Rows of the context table, sorted by context name.
///
/// Contexts without a body, or whose cluster is absent, are skipped. A name
/// listed twice keeps its first entry.
pub fn kube_context_rows(config: &Kubeconfig) -> Vec<KubeContextRow> {
    if config.clusters.is_empty() {
        return Vec::new();
    }

    let mut contexts = config.contexts.iter().collect::<Vec<_>>();
    contexts.sort_by(|a, b| a.name.cmp(&b.name));
    contexts.dedup_by(|later, earlier| later.name == earlier.name);

    contexts
        .into_iter()
        .filter_map(|named| {
            let context = named.context.as_ref()?;
            let cluster = get_named(&config.clusters, &context.cluster, |c| c.name.as_str())?
                .cluster
                .as_ref()?;
            Some(KubeContextRow {
                current: config.current_context.as_deref() == Some(named.name.as_str()),
                name: named.name.clone(),
                cluster: context.cluster.clone(),
                server: cluster.server.clone().unwrap_or_default(),
            })
        })
        .collect()
}

pub fn write_kube_contexts<W: Write>(config: &Kubeconfig, mut w: W) -> Result<(), Error> {
    let mut table = Table::new(kube_context_rows(config));
    table
        .with(Style::empty())
        .modify(Segment::all(), Padding::new(0, 2, 0, 0));
    // cells are padded to the column width, the last one included
    for line in table.to_string().lines() {
        writeln!(w, "{}", line.trim_end()).map_err(Error::Write)?;
    }
    w.flush().map_err(Error::Write)
}

/// Prints the context table to stdout. Any failure terminates the process.
pub fn print_kube_contexts<A: ConfigAccess + ?Sized>(access: &A) {
    let config = check_error(access.starting_config());
    let stdout = std::io::stdout();
    check_error(write_kube_contexts(&config, stdout.lock()));
}
