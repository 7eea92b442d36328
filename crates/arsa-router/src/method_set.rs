//! Allowed method sets.

use std::fmt;

use http::Method;
use smallvec::SmallVec;

use crate::error::PatternError;

/// The set of HTTP methods a route accepts.
///
/// Methods are stored upper-cased in declaration order without duplicates.
/// The default set is `{GET}`; `HEAD` is never added implicitly.
///
/// # Example
///
/// ```rust
/// use arsa_router::MethodSet;
/// use http::Method;
///
/// let methods = MethodSet::parse(["get", "post"]).unwrap();
/// assert!(methods.contains(&Method::POST));
/// assert!(!methods.contains(&Method::HEAD));
/// assert_eq!(methods.allow_header(), "GET, POST");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSet(SmallVec<[Method; 4]>);

impl MethodSet {
    /// Creates an empty set. Use [`MethodSet::default`] for `{GET}`.
    #[must_use]
    pub fn empty() -> Self {
        Self(SmallVec::new())
    }

    /// Parses method names, upper-casing them.
    pub fn parse<I, S>(names: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::empty();
        for name in names {
            let upper = name.as_ref().trim().to_ascii_uppercase();
            let method = Method::from_bytes(upper.as_bytes())
                .map_err(|_| PatternError::InvalidMethod(name.as_ref().to_string()))?;
            set.insert(method);
        }
        if set.is_empty() {
            return Err(PatternError::EmptyMethods);
        }
        Ok(set)
    }

    /// Adds a method if not already present.
    pub fn insert(&mut self, method: Method) {
        if !self.contains(&method) {
            self.0.push(method);
        }
    }

    /// Returns true if the set allows the method.
    #[must_use]
    pub fn contains(&self, method: &Method) -> bool {
        self.0.iter().any(|m| m == method)
    }

    /// Adds every method of `other`.
    pub fn extend(&mut self, other: &Self) {
        for method in other.iter() {
            self.insert(method.clone());
        }
    }

    /// Iterates the methods in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Method> {
        self.0.iter()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the set as an `Allow` header value.
    #[must_use]
    pub fn allow_header(&self) -> String {
        self.0
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for MethodSet {
    fn default() -> Self {
        let mut set = Self::empty();
        set.insert(Method::GET);
        set
    }
}

impl fmt::Display for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.allow_header())
    }
}
