//! One YAML file per object, laid out as `<root>/<namespace>/<plural>/<name>.yaml`

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::kubernetes::{ObjectSnapshot, ResourceDescriptor};

/// OpenShift reuses core kind names, so their files get a distinguishing prefix
const OPENSHIFT_GROUP_SUFFIX: &str = "openshift.io";
const OPENSHIFT_PREFIX: &str = "openshift_";

pub struct TreeSink {
    root: PathBuf,
}

impl TreeSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Destination file for an object; cluster-scoped objects sit at the empty-namespace level
    pub fn path_for(&self, resource: &ResourceDescriptor, object: &ObjectSnapshot) -> PathBuf {
        let mut path = self.root.clone();
        if !object.namespace().is_empty() {
            path.push(object.namespace());
        }
        path.push(&resource.plural);

        let prefix = if resource.group.ends_with(OPENSHIFT_GROUP_SUFFIX) {
            OPENSHIFT_PREFIX
        } else {
            ""
        };
        path.push(format!("{}{}.yaml", prefix, object.name()));
        path
    }

    /// Write the object, overwriting any file already at its path
    pub fn write_object(
        &mut self,
        resource: &ResourceDescriptor,
        object: &ObjectSnapshot,
    ) -> Result<()> {
        let path = self.path_for(resource, object);
        if let Some(dir) = path.parent() {
            create_dirs(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        let yaml = encode_yaml(object.to_json()?.as_bytes())?;

        let mut file = File::create(&path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(unix)]
fn create_dirs(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o755).create(dir)
}

#[cfg(not(unix))]
fn create_dirs(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

/// Re-encode a JSON or YAML payload as YAML
pub fn encode_yaml(raw: &[u8]) -> Result<String> {
    if is_json(raw) {
        let value: serde_json::Value = serde_json::from_slice(raw).context("Invalid JSON payload")?;
        Ok(serde_yaml::to_string(&value)?)
    } else {
        let value: serde_yaml::Value = serde_yaml::from_slice(raw).context("Invalid YAML payload")?;
        Ok(serde_yaml::to_string(&value)?)
    }
}

fn is_json(raw: &[u8]) -> bool {
    raw.iter()
        .find(|b| !matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        .is_some_and(|b| *b == b'{' || *b == b'[')
}
