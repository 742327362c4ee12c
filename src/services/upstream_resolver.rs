//! Kubernetes upstream resolution
//!
//! Locates the upstream whose Kubernetes spec matches a
//! name/namespace/port query. The upstream list is fetched fresh from
//! the store on every call; no caching.

use tracing::debug;

use crate::domain::{
    KubeUpstreamRef, Upstream, KUBE_SPEC_SERVICE_NAME, KUBE_SPEC_SERVICE_NAMESPACE,
    KUBE_SPEC_SERVICE_PORT, UPSTREAM_TYPE_KUBERNETES,
};
use crate::errors::{PorticoError, Result};
use crate::storage::ConfigStore;

/// Find the Kubernetes upstream matching `query`.
///
/// Candidates missing a string `service_name` are skipped, not
/// rejected. Namespace and port constraints apply only when set in the
/// query, and require the spec field to be present and equal (the port
/// compared against its decimal string form). First match wins; list
/// order is whatever the store returns.
pub async fn resolve_kube_upstream(
    store: &dyn ConfigStore,
    query: &KubeUpstreamRef,
) -> Result<Upstream> {
    let upstreams = store.list_upstreams().await?;
    debug!(count = upstreams.len(), service = %query.name, "scanning upstreams for kubernetes service");

    for upstream in upstreams {
        if upstream.upstream_type != UPSTREAM_TYPE_KUBERNETES {
            continue;
        }
        let service_name = match upstream.spec_str(KUBE_SPEC_SERVICE_NAME) {
            Some(name) => name,
            None => continue,
        };
        if service_name != query.name {
            continue;
        }
        if let Some(namespace) = &query.namespace {
            match upstream.spec_str(KUBE_SPEC_SERVICE_NAMESPACE) {
                Some(ns) if ns == namespace => {}
                _ => continue,
            }
        }
        if let Some(port) = query.port {
            match upstream.spec_str(KUBE_SPEC_SERVICE_PORT) {
                Some(p) if p == port.to_string() => {}
                _ => continue,
            }
        }
        return Ok(upstream);
    }

    Err(PorticoError::not_found(
        "kubernetes upstream",
        format!("{}/{}", query.namespace.as_deref().unwrap_or_default(), query.name),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryConfigStore;
    use serde_json::json;

    fn kube_upstream(name: &str, spec: serde_json::Value) -> Upstream {
        Upstream {
            name: name.to_string(),
            upstream_type: UPSTREAM_TYPE_KUBERNETES.to_string(),
            spec: spec.as_object().expect("spec must be an object").clone(),
        }
    }

    fn query(name: &str) -> KubeUpstreamRef {
        KubeUpstreamRef {
            name: name.to_string(),
            namespace: None,
            port: None,
        }
    }

    #[tokio::test]
    async fn test_unconstrained_query_matches_on_service_name() {
        let store = MemoryConfigStore::with_upstreams(vec![kube_upstream(
            "x-upstream",
            json!({"service_name": "x", "service_namespace": "ns"}),
        )]);

        let upstream = resolve_kube_upstream(&store, &query("x")).await.unwrap();
        assert_eq!(upstream.name, "x-upstream");
    }

    #[tokio::test]
    async fn test_namespace_mismatch_is_not_found() {
        let store = MemoryConfigStore::with_upstreams(vec![kube_upstream(
            "x-upstream",
            json!({"service_name": "x", "service_namespace": "ns"}),
        )]);

        let err = resolve_kube_upstream(
            &store,
            &KubeUpstreamRef {
                namespace: Some("ns2".to_string()),
                ..query("x")
            },
        )
        .await
        .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("ns2/x"), "{}", err);
    }

    #[tokio::test]
    async fn test_port_compared_as_string() {
        let store = MemoryConfigStore::with_upstreams(vec![
            kube_upstream("x-80", json!({"service_name": "x", "service_port": "80"})),
            kube_upstream("x-8080", json!({"service_name": "x", "service_port": "8080"})),
        ]);

        let upstream = resolve_kube_upstream(
            &store,
            &KubeUpstreamRef {
                port: Some(8080),
                ..query("x")
            },
        )
        .await
        .unwrap();
        assert_eq!(upstream.name, "x-8080");
    }

    #[tokio::test]
    async fn test_numeric_port_field_is_skipped() {
        // The port must be stored as a string; a JSON number is not a
        // match even when numerically equal.
        let store = MemoryConfigStore::with_upstreams(vec![kube_upstream(
            "x-upstream",
            json!({"service_name": "x", "service_port": 8080}),
        )]);

        let err = resolve_kube_upstream(
            &store,
            &KubeUpstreamRef {
                port: Some(8080),
                ..query("x")
            },
        )
        .await
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_non_kubernetes_and_nameless_entries_are_skipped() {
        let store = MemoryConfigStore::with_upstreams(vec![
            Upstream {
                name: "static-x".to_string(),
                upstream_type: "static".to_string(),
                spec: json!({"service_name": "x"}).as_object().unwrap().clone(),
            },
            kube_upstream("no-name", json!({"service_namespace": "ns"})),
            kube_upstream("x-upstream", json!({"service_name": "x"})),
        ]);

        let upstream = resolve_kube_upstream(&store, &query("x")).await.unwrap();
        assert_eq!(upstream.name, "x-upstream");
    }

    #[tokio::test]
    async fn test_first_match_wins_in_store_order() {
        // Two equally valid candidates: store order decides. Pinned
        // here so an unordered backend surfaces as a test failure.
        let store = MemoryConfigStore::with_upstreams(vec![
            kube_upstream("first", json!({"service_name": "x"})),
            kube_upstream("second", json!({"service_name": "x"})),
        ]);

        let upstream = resolve_kube_upstream(&store, &query("x")).await.unwrap();
        assert_eq!(upstream.name, "first");
    }
}
