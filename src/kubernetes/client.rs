// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResourceList;
use kube::api::{Api, ApiResource, DynamicObject, GroupVersionKind, ListParams, TypeMeta};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::Path;
use tracing::{debug, info};

use super::ListTarget;
use super::discovery::{
    DiscoveredResource, PreferredGroup, ResourceDescriptor, merge_group_versions,
};
use super::object::ObjectSnapshot;

/// The two cluster calls collection depends on
#[async_trait]
pub trait ClusterApi {
    /// Every API group's resources, each at its preferred version where served, in server order
    async fn preferred_resources(&self) -> Result<Vec<PreferredGroup>>;

    /// List every object of one coordinate
    async fn list(
        &self,
        resource: &ResourceDescriptor,
        target: ListTarget<'_>,
    ) -> Result<Vec<ObjectSnapshot>>;
}

/// Install aws-lc-rs as the process-wide rustls provider
///
/// Returns false when a provider was already installed; that one stays in use.
pub fn install_crypto_provider() -> bool {
    match rustls::crypto::aws_lc_rs::default_provider().install_default() {
        Ok(()) => true,
        Err(_) => {
            debug!("rustls crypto provider already installed, keeping it");
            false
        }
    }
}

/// A live cluster reached through kubeconfig
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    /// Build a client from a kubeconfig file, using `context` or the file's current context
    pub async fn connect(kubeconfig_path: &Path, context: Option<&str>) -> Result<Self> {
        let kubeconfig = Kubeconfig::read_from(kubeconfig_path).with_context(|| {
            format!(
                "Failed to load kubeconfig: {}",
                kubeconfig_path.display()
            )
        })?;

        if let Some(ctx) = context
            && !kubeconfig.contexts.iter().any(|c| c.name == ctx)
        {
            return Err(anyhow!("Context '{}' not found in kubeconfig", ctx));
        }

        let config = Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: context.map(String::from),
                ..Default::default()
            },
        )
        .await
        .with_context(|| {
            format!(
                "Failed to load kubeconfig: {}",
                kubeconfig_path.display()
            )
        })?;

        info!(cluster = %config.cluster_url, "Connecting to cluster");

        let client = Client::try_from(config).context("Failed to create Kubernetes client")?;

        Ok(Self { client })
    }

    async fn core_groups(&self) -> Result<Vec<PreferredGroup>> {
        let versions = self
            .client
            .list_core_api_versions()
            .await
            .context("Failed to list core API versions")?;

        // The core group has no preferred version of its own; the first one stands in
        let Some(preferred) = versions.versions.first().cloned() else {
            return Ok(Vec::new());
        };

        let mut listings = Vec::with_capacity(versions.versions.len());
        for version in &versions.versions {
            let list = self
                .client
                .list_core_api_resources(version)
                .await
                .with_context(|| format!("Failed to list core API resources for {}", version))?;
            listings.push(preferred_group(list));
        }

        Ok(merge_group_versions(&preferred, listings))
    }
}

#[async_trait]
impl ClusterApi for KubeCluster {
    async fn preferred_resources(&self) -> Result<Vec<PreferredGroup>> {
        let mut groups = self.core_groups().await?;

        let api_groups = self
            .client
            .list_api_groups()
            .await
            .context("Failed to list API groups")?;

        for api_group in api_groups.groups {
            let Some(preferred) = api_group
                .preferred_version
                .as_ref()
                .or_else(|| api_group.versions.first())
                .map(|v| v.group_version.clone())
            else {
                continue;
            };

            let mut listings = Vec::with_capacity(api_group.versions.len());
            for version in &api_group.versions {
                let list = self
                    .client
                    .list_api_group_resources(&version.group_version)
                    .await
                    .with_context(|| {
                        format!(
                            "Failed to list API resources for {}",
                            version.group_version
                        )
                    })?;
                listings.push(preferred_group(list));
            }

            groups.extend(merge_group_versions(&preferred, listings));
        }

        debug!(groups = groups.len(), "Discovered preferred resources");

        Ok(groups)
    }

    async fn list(
        &self,
        resource: &ResourceDescriptor,
        target: ListTarget<'_>,
    ) -> Result<Vec<ObjectSnapshot>> {
        let gvk = GroupVersionKind::gvk(&resource.group, &resource.version, &resource.kind);
        let ar = ApiResource::from_gvk_with_plural(&gvk, &resource.plural);

        let api: Api<DynamicObject> = match target {
            ListTarget::Namespace(ns) if !ns.is_empty() => {
                Api::namespaced_with(self.client.clone(), ns, &ar)
            }
            _ => Api::all_with(self.client.clone(), &ar),
        };

        let list = api.list(&ListParams::default()).await?;

        // Items of a list response don't always carry their own type meta
        let api_version = resource.api_version();
        list.items
            .into_iter()
            .map(|mut item| {
                if item.types.is_none() {
                    item.types = Some(TypeMeta {
                        api_version: api_version.clone(),
                        kind: resource.kind.clone(),
                    });
                }
                Ok::<_, anyhow::Error>(ObjectSnapshot::new(serde_json::to_value(item)?))
            })
            .collect()
    }
}

fn preferred_group(list: APIResourceList) -> PreferredGroup {
    PreferredGroup {
        group_version: list.group_version,
        resources: list
            .resources
            .into_iter()
            .map(|r| DiscoveredResource {
                name: r.name,
                namespaced: r.namespaced,
                kind: r.kind,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResource;

    fn api_resource(name: &str, namespaced: bool, kind: &str) -> APIResource {
        APIResource {
            name: name.to_string(),
            namespaced,
            kind: kind.to_string(),
            verbs: vec!["list".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_preferred_group_conversion() {
        let list = APIResourceList {
            group_version: "apps/v1".to_string(),
            resources: vec![
                api_resource("deployments", true, "Deployment"),
                api_resource("deployments/scale", true, "Scale"),
            ],
        };

        let group = preferred_group(list);
        assert_eq!(group.group_version, "apps/v1");
        assert_eq!(group.resources.len(), 2);
        assert_eq!(group.resources[0].name, "deployments");
        assert!(group.resources[0].namespaced);
        assert_eq!(group.resources[1].kind, "Scale");
    }

    #[test]
    fn test_crypto_provider_installed_once() {
        install_crypto_provider();
        assert!(!install_crypto_provider());
        assert!(rustls::crypto::CryptoProvider::get_default().is_some());
    }

    #[tokio::test]
    async fn test_connect_missing_kubeconfig() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let err = KubeCluster::connect(&temp_dir.path().join("config"), None)
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("Failed to load kubeconfig"));
    }
}
