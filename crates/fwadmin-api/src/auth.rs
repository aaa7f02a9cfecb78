/// Which authentication strategy a backend uses.
///
/// Marker enum (no data) -- the secret material lives in the clients.
/// Useful for branching on auth flow without carrying credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// OAuth password grant returning a bearer token (REST backend).
    TokenPasswordGrant,
    /// API key issued by a keygen request (XML backend).
    KeyGeneration,
}

/// The management API style of the target device.
///
/// Determines URL prefixes, the login flow, and how the session token is
/// attached to requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// REST/JSON device API -- `/api/fdm/latest` prefix, bearer token.
    Rest,
    /// XML/XPath device API -- single `/api/` endpoint, key query parameter.
    Xml,
}

impl Backend {
    pub fn auth_strategy(self) -> AuthStrategy {
        match self {
            Self::Rest => AuthStrategy::TokenPasswordGrant,
            Self::Xml => AuthStrategy::KeyGeneration,
        }
    }

    /// The path prefix every endpoint of this backend lives under.
    pub fn api_prefix(self) -> &'static str {
        match self {
            Self::Rest => "/api/fdm/latest",
            Self::Xml => "/api/",
        }
    }

    /// The login endpoint path, relative to the device root.
    ///
    /// The XML backend has no dedicated path: keygen is a query on the API root.
    pub fn login_path(self) -> &'static str {
        match self {
            Self::Rest => "/api/fdm/latest/fdm/token",
            Self::Xml => "/api/",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_follows_backend() {
        assert_eq!(Backend::Rest.auth_strategy(), AuthStrategy::TokenPasswordGrant);
        assert_eq!(Backend::Xml.auth_strategy(), AuthStrategy::KeyGeneration);
    }

    #[test]
    fn login_paths() {
        assert_eq!(Backend::Rest.login_path(), "/api/fdm/latest/fdm/token");
        assert_eq!(Backend::Xml.login_path(), Backend::Xml.api_prefix());
    }
}
