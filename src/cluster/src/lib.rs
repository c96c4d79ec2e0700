pub mod cluster;
pub mod codec;
pub mod endpoint;
pub mod error;
pub mod kubeconfig;
pub mod options;
pub mod rest_config;
pub mod util;

#[cfg(test)]
pub(crate) mod fixture;
