//! Route domain types
//!
//! A route pairs a single matcher with a single action. Matchers and
//! actions are closed sets of variants, encoded on the wire as
//! internally tagged unions (`type` discriminator, camelCase fields) so
//! that exactly one variant is ever populated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single routing rule: one matcher, one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Predicate deciding which requests (or events) this route applies to
    pub matcher: Matcher,

    /// Optional path prefix rewrite applied before forwarding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_rewrite: Option<String>,

    /// Where matched traffic is sent
    pub action: RouteAction,
}

/// Matcher variants. A route matches either a named event type or an
/// HTTP request shape, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Matcher {
    /// Event-driven matcher keyed on an event type string
    #[serde(rename_all = "camelCase")]
    Event { event_type: String },

    /// Request matcher: path plus optional method and header constraints
    #[serde(rename_all = "camelCase")]
    Request {
        path: PathMatch,

        /// Upper-cased HTTP methods; empty means no method restriction
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        methods: Vec<String>,

        /// Exact-value header constraints; empty means no header restriction
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        headers: BTreeMap<String, String>,
    },
}

/// Path matching strategy for request matchers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PathMatch {
    /// Exact path match (e.g. "/api/users" matches only "/api/users")
    Exact { value: String },

    /// Regular expression match
    Regex { value: String },

    /// Prefix match (e.g. "/api" matches "/api/users", "/api/products")
    Prefix { value: String },
}

impl PathMatch {
    /// The pattern string regardless of strategy
    pub fn value(&self) -> &str {
        match self {
            PathMatch::Exact { value }
            | PathMatch::Regex { value }
            | PathMatch::Prefix { value } => value,
        }
    }
}

/// Destination variants. The weighted form is round-trippable and
/// displayable but never constructed from flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RouteAction {
    /// Forward to an upstream service
    Upstream { name: String },

    /// Invoke a named function on an upstream service
    #[serde(rename_all = "camelCase")]
    Function {
        upstream_name: String,
        function_name: String,
    },

    /// Split traffic across weighted destinations
    Weighted {
        destinations: Vec<WeightedDestination>,
    },
}

/// One arm of a weighted destination set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedDestination {
    pub weight: u32,
    pub upstream: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_wire_encoding() {
        let route = Route {
            matcher: Matcher::Request {
                path: PathMatch::Prefix { value: "/api".to_string() },
                methods: vec!["GET".to_string(), "POST".to_string()],
                headers: BTreeMap::from([("x-tenant".to_string(), "acme".to_string())]),
            },
            prefix_rewrite: Some("/internal".to_string()),
            action: RouteAction::Upstream { name: "billing".to_string() },
        };

        let value = serde_json::to_value(&route).unwrap();
        assert_eq!(
            value,
            json!({
                "matcher": {
                    "type": "request",
                    "path": {"type": "prefix", "value": "/api"},
                    "methods": ["GET", "POST"],
                    "headers": {"x-tenant": "acme"}
                },
                "prefixRewrite": "/internal",
                "action": {"type": "upstream", "name": "billing"}
            })
        );
    }

    #[test]
    fn test_event_matcher_omits_request_fields() {
        let route = Route {
            matcher: Matcher::Event { event_type: "user.created".to_string() },
            prefix_rewrite: None,
            action: RouteAction::Function {
                upstream_name: "events".to_string(),
                function_name: "ingest".to_string(),
            },
        };

        let value = serde_json::to_value(&route).unwrap();
        assert_eq!(
            value,
            json!({
                "matcher": {"type": "event", "eventType": "user.created"},
                "action": {
                    "type": "function",
                    "upstreamName": "events",
                    "functionName": "ingest"
                }
            })
        );
    }

    #[test]
    fn test_route_yaml_round_trip() {
        let yaml = r#"
matcher:
  type: request
  path:
    type: exact
    value: /healthz
action:
  type: weighted
  destinations:
    - weight: 80
      upstream: primary
    - weight: 20
      upstream: canary
      function: probe
"#;
        let route: Route = serde_yaml::from_str(yaml).unwrap();
        match &route.action {
            RouteAction::Weighted { destinations } => {
                assert_eq!(destinations.len(), 2);
                assert_eq!(destinations[0].weight, 80);
                assert_eq!(destinations[1].function.as_deref(), Some("probe"));
            }
            other => panic!("unexpected action: {:?}", other),
        }
        assert!(route.prefix_rewrite.is_none());
    }
}
