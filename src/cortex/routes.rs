//! Route table for the Cortex REST API
//!
//! Each API family lives under a fixed prefix. The prefixes are keyed by
//! [`Domain`] so a typo is a compile error rather than an empty URL.

use std::fmt;
use std::str::FromStr;

/// API families exposed by Cortex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Catalog,
    Descriptors,
    Departments,
    ResourceDefinitions,
    Scorecards,
    Teams,
}

impl Domain {
    pub const ALL: [Domain; 6] = [
        Domain::Catalog,
        Domain::Descriptors,
        Domain::Departments,
        Domain::ResourceDefinitions,
        Domain::Scorecards,
        Domain::Teams,
    ];

    /// Path prefix for this API family
    pub const fn base_uri(self) -> &'static str {
        match self {
            Domain::Catalog => "/api/v1/catalog",
            Domain::Descriptors => "/api/v1/open-api",
            Domain::Departments => "/api/v1/teams/departments",
            Domain::ResourceDefinitions => "/api/v1/catalog/definitions",
            Domain::Scorecards => "/api/v1/scorecards",
            Domain::Teams => "/api/v1/teams",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Domain::Catalog => "catalog",
            Domain::Descriptors => "descriptors",
            Domain::Departments => "departments",
            Domain::ResourceDefinitions => "resource_definitions",
            Domain::Scorecards => "scorecards",
            Domain::Teams => "teams",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown API domain: {0}")]
pub struct UnknownDomain(pub String);

impl FromStr for Domain {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| UnknownDomain(s.to_string()))
    }
}

/// Routes bound to a concrete API host
#[derive(Debug, Clone)]
pub struct Routes {
    base_url: String,
}

impl Routes {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Concatenate the domain prefix with `path`, verbatim
    pub fn route(domain: Domain, path: &str) -> String {
        format!("{}{}", domain.base_uri(), path)
    }

    /// Absolute URL for `path` under `domain`
    pub fn url(&self, domain: Domain, path: &str) -> String {
        format!("{}{}", self.base_url, Self::route(domain, path))
    }
}

/// Percent-encode a single path segment (tags may contain arbitrary characters)
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_concatenates_verbatim() {
        assert_eq!(Routes::route(Domain::Catalog, "/my-service"), "/api/v1/catalog/my-service");
        assert_eq!(Routes::route(Domain::Scorecards, "/descriptor"), "/api/v1/scorecards/descriptor");
        assert_eq!(Routes::route(Domain::Teams, ""), "/api/v1/teams");
    }

    #[test]
    fn test_url_strips_trailing_slash() {
        let routes = Routes::new("https://api.getcortexapp.com/");
        assert_eq!(
            routes.url(Domain::Departments, ""),
            "https://api.getcortexapp.com/api/v1/teams/departments"
        );
    }

    #[test]
    fn test_domain_from_str() {
        for domain in Domain::ALL {
            assert_eq!(domain.name().parse::<Domain>().unwrap(), domain);
        }
        assert!("catalogue".parse::<Domain>().is_err());
    }

    #[test]
    fn test_segment_encodes_reserved_characters() {
        assert_eq!(segment("a b/c"), "a%20b%2Fc");
        assert_eq!(segment("plain-tag"), "plain-tag");
    }
}
