//! Integration tests for the route construction and attachment flow
//!
//! Exercises the builder and resolvers together against the in-memory
//! store, the way the CLI drives them: resolve the upstream reference,
//! build the route, resolve the target virtual host, attach and
//! persist.

use porticoctl::domain::{
    KubeUpstreamRef, Matcher, PathMatch, RouteAction, Upstream, DEFAULT_VIRTUAL_HOST,
    UPSTREAM_TYPE_KUBERNETES,
};
use porticoctl::services::{resolve_virtual_host, route_from_details, RouteDetails};
use porticoctl::storage::{ConfigStore, MemoryConfigStore};
use serde_json::json;

fn kube_upstream(name: &str, service: &str, namespace: &str) -> Upstream {
    Upstream {
        name: name.to_string(),
        upstream_type: UPSTREAM_TYPE_KUBERNETES.to_string(),
        spec: json!({"service_name": service, "service_namespace": namespace})
            .as_object()
            .expect("spec is an object")
            .clone(),
    }
}

/// The full `route create --domain` flow: kube reference resolution,
/// route construction, domain-based virtual host creation, attachment.
#[tokio::test]
async fn test_route_create_flow_with_domain_and_kube_upstream() {
    let store = MemoryConfigStore::new();
    store.insert_upstream(kube_upstream("petstore-prod", "petstore", "prod"));

    let details = RouteDetails {
        path_prefix: Some("/pets".to_string()),
        methods: Some("get".to_string()),
        kube: Some(KubeUpstreamRef {
            name: "petstore".to_string(),
            namespace: Some("prod".to_string()),
            port: None,
        }),
        ..Default::default()
    };
    let route = route_from_details(&store, details).await.expect("route builds");
    assert_eq!(route.action, RouteAction::Upstream { name: "petstore-prod".to_string() });

    let resolved = resolve_virtual_host(&store, None, Some("pets.example.com"), true)
        .await
        .expect("virtual host resolves");
    assert!(resolved.created);

    let mut virtual_host = resolved.virtual_host;
    virtual_host.routes.push(route);
    store.update_virtual_host(&virtual_host).await.expect("update succeeds");

    // The default virtual host was bootstrapped as a side effect.
    assert!(store.get_virtual_host(DEFAULT_VIRTUAL_HOST).await.is_ok());

    // The attached route survives a round trip through the store.
    let stored = store.get_virtual_host("pets.example.com").await.expect("virtual host stored");
    assert_eq!(stored.routes.len(), 1);
    match &stored.routes[0].matcher {
        Matcher::Request { path, methods, .. } => {
            assert_eq!(path, &PathMatch::Prefix { value: "/pets".to_string() });
            assert_eq!(methods, &vec!["GET".to_string()]);
        }
        other => panic!("unexpected matcher: {:?}", other),
    }
}

/// A second resolution of the same domain finds the host created by the
/// first, instead of creating again.
#[tokio::test]
async fn test_domain_resolution_is_stable_across_calls() {
    let store = MemoryConfigStore::new();

    let first = resolve_virtual_host(&store, None, Some("foo.com"), true).await.unwrap();
    assert!(first.created);

    let second = resolve_virtual_host(&store, None, Some("foo.com"), true).await.unwrap();
    assert!(!second.created);
    assert_eq!(second.virtual_host.name, first.virtual_host.name);
}

/// Routes built twice from the same details compare equal, which is
/// what `route delete` relies on to find the route to remove.
#[tokio::test]
async fn test_identical_details_build_equal_routes() {
    let store = MemoryConfigStore::new();

    let details = RouteDetails {
        path_exact: Some("/pay".to_string()),
        headers: Some("x-tenant:acme".to_string()),
        upstream: Some("billing".to_string()),
        function: Some("charge".to_string()),
        prefix_rewrite: Some("/internal".to_string()),
        ..Default::default()
    };

    let first = route_from_details(&store, details.clone()).await.unwrap();
    let second = route_from_details(&store, details).await.unwrap();
    assert_eq!(first, second);
}

/// Lookups with no name and no domain land on the default virtual
/// host, including when routes were attached to it earlier.
#[tokio::test]
async fn test_routes_attach_to_default_virtual_host() {
    let store = MemoryConfigStore::new();

    let resolved = resolve_virtual_host(&store, None, None, false).await.unwrap();
    assert_eq!(resolved.virtual_host.name, DEFAULT_VIRTUAL_HOST);

    let details = RouteDetails {
        path_prefix: Some("/api".to_string()),
        upstream: Some("api-backend".to_string()),
        ..Default::default()
    };
    let route = route_from_details(&store, details).await.unwrap();

    let mut virtual_host = resolved.virtual_host;
    virtual_host.routes.push(route);
    store.update_virtual_host(&virtual_host).await.unwrap();

    let again = resolve_virtual_host(&store, None, None, false).await.unwrap();
    assert_eq!(again.virtual_host.routes.len(), 1);
}
