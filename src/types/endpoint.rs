//! Backend operations and their HTTP methods.

use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP method of a backend call.
///
/// GET requests carry their payload as a query string; POST requests as a
/// JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// HTTP GET.
    Get,
    /// HTTP POST.
    Post,
}

impl Method {
    /// Returns the method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

/// One of the backend operations exposed by the SDK.
///
/// Used as a label in logs and by [`MockBackend`](crate::testing::MockBackend)
/// to key canned responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Endpoint {
    /// `GET /ping`
    Ping,
    /// `GET /api/v1/model/systems/{system}/token`
    GetToken,
    /// `POST /api/v1/policy/query`
    PolicyQuery,
    /// `POST /api/v2/policy/systems/{system}/query/`
    V2PolicyQuery,
    /// `POST /api/v1/policy/query_by_actions`
    PolicyQueryByActions,
    /// `POST /api/v2/policy/systems/{system}/query_by_actions/`
    V2PolicyQueryByActions,
    /// `POST /api/v1/policy/auth`
    PolicyAuth,
    /// `POST /api/v2/policy/systems/{system}/auth/`
    V2PolicyAuth,
    /// `POST /api/v1/policy/auth_by_resources`
    PolicyAuthByResources,
    /// `POST /api/v1/policy/auth_by_actions`
    PolicyAuthByActions,
    /// `GET /api/v1/systems/{system}/policies/{id}`
    PolicyGet,
    /// `GET /api/v1/systems/{system}/policies`
    PolicyList,
    /// `GET /api/v1/systems/{system}/policies/-/subjects`
    PolicySubjects,
    /// `POST /api/v1/open/application/`
    GetApplyUrl,
}

impl Endpoint {
    /// Every endpoint, in declaration order.
    pub const ALL: [Endpoint; 14] = [
        Endpoint::Ping,
        Endpoint::GetToken,
        Endpoint::PolicyQuery,
        Endpoint::V2PolicyQuery,
        Endpoint::PolicyQueryByActions,
        Endpoint::V2PolicyQueryByActions,
        Endpoint::PolicyAuth,
        Endpoint::V2PolicyAuth,
        Endpoint::PolicyAuthByResources,
        Endpoint::PolicyAuthByActions,
        Endpoint::PolicyGet,
        Endpoint::PolicyList,
        Endpoint::PolicySubjects,
        Endpoint::GetApplyUrl,
    ];

    /// Returns the HTTP method the endpoint is called with.
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Ping
            | Endpoint::GetToken
            | Endpoint::PolicyGet
            | Endpoint::PolicyList
            | Endpoint::PolicySubjects => Method::Get,
            _ => Method::Post,
        }
    }

    /// Returns the snake_case operation name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Ping => "ping",
            Endpoint::GetToken => "get_token",
            Endpoint::PolicyQuery => "policy_query",
            Endpoint::V2PolicyQuery => "v2_policy_query",
            Endpoint::PolicyQueryByActions => "policy_query_by_actions",
            Endpoint::V2PolicyQueryByActions => "v2_policy_query_by_actions",
            Endpoint::PolicyAuth => "policy_auth",
            Endpoint::V2PolicyAuth => "v2_policy_auth",
            Endpoint::PolicyAuthByResources => "policy_auth_by_resources",
            Endpoint::PolicyAuthByActions => "policy_auth_by_actions",
            Endpoint::PolicyGet => "policy_get",
            Endpoint::PolicyList => "policy_list",
            Endpoint::PolicySubjects => "policy_subjects",
            Endpoint::GetApplyUrl => "get_apply_url",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_endpoints() {
        let gets: Vec<_> = Endpoint::ALL
            .iter()
            .filter(|e| e.method() == Method::Get)
            .collect();
        assert_eq!(
            gets,
            vec![
                &Endpoint::Ping,
                &Endpoint::GetToken,
                &Endpoint::PolicyGet,
                &Endpoint::PolicyList,
                &Endpoint::PolicySubjects,
            ]
        );
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = Endpoint::ALL.iter().map(|e| e.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Endpoint::ALL.len());
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(reqwest::Method::from(Method::Get), reqwest::Method::GET);
        assert_eq!(reqwest::Method::from(Method::Post), reqwest::Method::POST);
        assert_eq!(Method::Post.to_string(), "POST");
    }
}
