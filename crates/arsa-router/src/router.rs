//! Specificity-ranked route table.

use http::Method;

use crate::error::{MatchError, PatternError};
use crate::method_set::MethodSet;
use crate::pattern::Pattern;
use crate::RouteMatch;

#[derive(Debug, Clone)]
struct Entry {
    pattern: Pattern,
    methods: MethodSet,
    endpoint: String,
}

impl Entry {
    /// Lower sorts first: fewest variables, then longest static prefix.
    fn rank(&self) -> (usize, std::cmp::Reverse<usize>) {
        (
            self.pattern.variable_count(),
            std::cmp::Reverse(self.pattern.static_prefix_len()),
        )
    }
}

/// Route table mapping patterns and method sets to endpoint names.
///
/// The table is filled during declaration and only read afterwards. Among
/// the patterns that structurally match a path, the most specific one that
/// allows the request method wins: fewest variable segments, then longest
/// static prefix, then earliest registration.
///
/// # Example
///
/// ```rust
/// use arsa_router::{MatchError, MethodSet, Router};
/// use http::Method;
///
/// let mut router = Router::new();
/// router.insert("/users/<id>", MethodSet::default(), "get_user").unwrap();
/// router.insert("/users/me", MethodSet::default(), "get_me").unwrap();
///
/// let m = router.match_route(&Method::GET, "/users/me").unwrap();
/// assert_eq!(m.endpoint, "get_me");
///
/// let err = router.match_route(&Method::POST, "/users/7").unwrap_err();
/// assert!(matches!(err, MatchError::MethodNotAllowed { .. }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Router {
    entries: Vec<Entry>,
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `pattern` and appends it to the table.
    pub fn insert(
        &mut self,
        pattern: &str,
        methods: MethodSet,
        endpoint: impl Into<String>,
    ) -> Result<(), PatternError> {
        if methods.is_empty() {
            return Err(PatternError::EmptyMethods);
        }
        let pattern = Pattern::parse(pattern)?;
        self.entries.push(Entry {
            pattern,
            methods,
            endpoint: endpoint.into(),
        });
        Ok(())
    }

    /// Resolves a method and path to an endpoint and its converted variables.
    pub fn match_route(&self, method: &Method, path: &str) -> Result<RouteMatch<'_>, MatchError> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let mut best: Option<(&Entry, crate::Params)> = None;
        let mut path_matched = false;
        let mut allowed = MethodSet::empty();

        for entry in &self.entries {
            let Some(params) = entry.pattern.match_segments(&parts) else {
                continue;
            };
            path_matched = true;

            if !entry.methods.contains(method) {
                allowed.extend(&entry.methods);
                continue;
            }

            // Strict comparison keeps the earliest registration on ties.
            let better = best
                .as_ref()
                .map_or(true, |(current, _)| entry.rank() < current.rank());
            if better {
                best = Some((entry, params));
            }
        }

        match best {
            Some((entry, params)) => Ok(RouteMatch {
                endpoint: &entry.endpoint,
                pattern: &entry.pattern,
                params,
            }),
            None if path_matched => Err(MatchError::MethodNotAllowed { allowed }),
            None => Err(MatchError::NotFound),
        }
    }

    /// Returns the number of registered patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no pattern is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParamValue;

    fn get() -> MethodSet {
        MethodSet::default()
    }

    #[test]
    fn test_empty_router_is_not_found() {
        let router = Router::new();
        assert!(router.is_empty());
        assert_eq!(
            router.match_route(&Method::GET, "/anything"),
            Err(MatchError::NotFound)
        );
    }

    #[test]
    fn test_unregistered_path_is_not_found_for_every_method() {
        let mut router = Router::new();
        router.insert("/users", get(), "list_users").unwrap();

        for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
            assert_eq!(
                router.match_route(&method, "/posts"),
                Err(MatchError::NotFound)
            );
        }
    }

    #[test]
    fn test_wrong_method_is_method_not_allowed() {
        let mut router = Router::new();
        router.insert("/users", get(), "list_users").unwrap();

        for method in [Method::POST, Method::PUT, Method::DELETE, Method::HEAD] {
            let err = router.match_route(&method, "/users").unwrap_err();
            assert_eq!(err, MatchError::MethodNotAllowed { allowed: get() });
        }
    }

    #[test]
    fn test_allowed_methods_are_unioned() {
        let mut router = Router::new();
        router
            .insert("/users/<id>", MethodSet::parse(["PUT"]).unwrap(), "put_user")
            .unwrap();
        router
            .insert("/users/<int:id>", MethodSet::parse(["DELETE"]).unwrap(), "delete_user")
            .unwrap();

        let err = router.match_route(&Method::GET, "/users/4").unwrap_err();
        let MatchError::MethodNotAllowed { allowed } = err else {
            panic!("expected method not allowed");
        };
        assert_eq!(allowed.allow_header(), "PUT, DELETE");
    }

    #[test]
    fn test_fewest_variables_wins() {
        let mut router = Router::new();
        router.insert("/users/<id>", get(), "by_id").unwrap();
        router.insert("/users/me", get(), "me").unwrap();

        assert_eq!(router.match_route(&Method::GET, "/users/me").unwrap().endpoint, "me");
        assert_eq!(router.match_route(&Method::GET, "/users/9").unwrap().endpoint, "by_id");
    }

    #[test]
    fn test_longest_static_prefix_breaks_ties() {
        let mut router = Router::new();
        router.insert("/<org>/repos/<name>", get(), "org_repo").unwrap();
        router.insert("/api/<version>/<name>", get(), "api").unwrap();

        let m = router.match_route(&Method::GET, "/api/repos/x").unwrap();
        assert_eq!(m.endpoint, "api");
    }

    #[test]
    fn test_registration_order_breaks_remaining_ties() {
        let mut router = Router::new();
        router.insert("/a/<x>", get(), "first").unwrap();
        router.insert("/a/<y>", get(), "second").unwrap();

        assert_eq!(router.match_route(&Method::GET, "/a/1").unwrap().endpoint, "first");
    }

    #[test]
    fn test_method_filter_applies_before_ranking() {
        let mut router = Router::new();
        router.insert("/users/<id>", MethodSet::parse(["POST"]).unwrap(), "update").unwrap();
        router.insert("/users/me", get(), "me").unwrap();

        let m = router.match_route(&Method::POST, "/users/me").unwrap();
        assert_eq!(m.endpoint, "update");
    }

    #[test]
    fn test_converter_failure_is_not_found() {
        let mut router = Router::new();
        router.insert("/foobar/<int:slug>", get(), "typed").unwrap();

        assert_eq!(
            router.match_route(&Method::GET, "/foobar/bar"),
            Err(MatchError::NotFound)
        );
        let m = router.match_route(&Method::GET, "/foobar/12").unwrap();
        assert_eq!(m.params.get("slug"), Some(&ParamValue::Int(12)));
        assert_eq!(m.pattern.as_str(), "/foobar/<int:slug>");
    }

    #[test]
    fn test_insert_rejects_invalid_pattern() {
        let mut router = Router::new();
        assert!(router.insert("no-slash", get(), "x").is_err());
        assert!(router.insert("/x", MethodSet::empty(), "x").is_err());
        assert_eq!(router.len(), 0);
    }
}
