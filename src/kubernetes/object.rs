// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Self-describing object documents returned by list calls

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

/// A listed object, kept as the decoded document so no server field is lost
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSnapshot {
    document: Value,
}

impl ObjectSnapshot {
    pub fn new(document: Value) -> Self {
        Self { document }
    }

    pub fn kind(&self) -> &str {
        self.str_at("/kind")
    }

    pub fn api_version(&self) -> &str {
        self.str_at("/apiVersion")
    }

    /// Namespace, empty for cluster-scoped objects
    pub fn namespace(&self) -> &str {
        self.str_at("/metadata/namespace")
    }

    pub fn name(&self) -> &str {
        self.str_at("/metadata/name")
    }

    /// Creation time, or the zero instant when absent or unparsable
    pub fn creation_timestamp(&self) -> DateTime<Utc> {
        self.document
            .pointer("/metadata/creationTimestamp")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(zero_instant)
    }

    /// Full JSON form of the document
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.document)?)
    }

    fn str_at(&self, pointer: &str) -> &str {
        self.document
            .pointer(pointer)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

/// `0001-01-01T00:00:00Z`, the timestamp reported for objects without one
pub fn zero_instant() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|n| n.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let obj = ObjectSnapshot::new(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {
                "name": "web",
                "namespace": "default",
                "creationTimestamp": "2025-08-10T09:39:09Z"
            },
            "spec": {"replicas": 3}
        }));
        assert_eq!(obj.kind(), "Deployment");
        assert_eq!(obj.api_version(), "apps/v1");
        assert_eq!(obj.name(), "web");
        assert_eq!(obj.namespace(), "default");
        assert_eq!(
            obj.creation_timestamp(),
            DateTime::parse_from_rfc3339("2025-08-10T09:39:09Z").unwrap()
        );
    }

    #[test]
    fn test_cluster_scoped_has_empty_namespace() {
        let obj = ObjectSnapshot::new(json!({
            "kind": "Node",
            "metadata": {"name": "node-1"}
        }));
        assert_eq!(obj.namespace(), "");
        assert_eq!(obj.api_version(), "");
    }

    #[test]
    fn test_missing_timestamp_is_zero_instant() {
        let obj = ObjectSnapshot::new(json!({"metadata": {"name": "x"}}));
        assert_eq!(obj.creation_timestamp(), zero_instant());
        assert_eq!(
            zero_instant().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            "0001-01-01T00:00:00Z"
        );
    }

    #[test]
    fn test_to_json_keeps_all_fields() {
        let doc = json!({
            "kind": "ConfigMap",
            "metadata": {"name": "cfg", "labels": {"app": "x"}},
            "data": {"key": "value"}
        });
        let obj = ObjectSnapshot::new(doc.clone());
        let parsed: Value = serde_json::from_str(&obj.to_json().unwrap()).unwrap();
        assert_eq!(parsed, doc);
    }
}
