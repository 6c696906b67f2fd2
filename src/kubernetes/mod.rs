mod client;
pub mod discovery;
mod object;

pub use client::{ClusterApi, KubeCluster, install_crypto_provider};
pub use discovery::{PreferredGroup, ResourceDescriptor};
pub use object::ObjectSnapshot;

/// Where a single list call is pointed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget<'a> {
    /// Namespaced kind, every namespace in one call
    AllNamespaces,
    /// Namespaced kind, one namespace
    Namespace(&'a str),
    /// Cluster-scoped kind
    Cluster,
}
