//! Endpoint methods of [`BackendClient`].

use serde::Serialize;

use super::BackendClient;
use crate::Error;
use crate::config::ENDPOINT_TIMEOUT;
use crate::types::{Endpoint, Payload, join_ids, payload_str};

#[derive(Serialize)]
struct SubjectsQuery {
    ids: String,
}

fn system_segment(system: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(system)
}

impl BackendClient {
    /// Checks that the backend is reachable.
    ///
    /// Sends `GET /ping` without credentials or envelope handling; any
    /// transport failure or non-200 status is an error.
    pub async fn ping(&self) -> Result<(), Error> {
        self.inner.dispatcher.ping().await
    }

    /// Returns the system's callback token.
    ///
    /// Fails with [`ErrorKind::MissingField`](crate::ErrorKind::MissingField)
    /// if the response has no `token`, and
    /// [`ErrorKind::InvalidField`](crate::ErrorKind::InvalidField) if it is
    /// not a string.
    pub async fn get_token(&self) -> Result<String, Error> {
        let path = format!(
            "/api/v1/model/systems/{}/token",
            system_segment(self.system())
        );
        let data = self
            .request_map(Endpoint::GetToken, &path, &Payload::new())
            .await?;
        Ok(payload_str(&data, "token")?.to_string())
    }

    /// Queries the policy of one action.
    pub async fn policy_query<B>(&self, body: &B) -> Result<Payload, Error>
    where
        B: Serialize + ?Sized,
    {
        self.request_map(Endpoint::PolicyQuery, "/api/v1/policy/query", body)
            .await
    }

    /// Queries the policy of one action in `system` (v2 API).
    pub async fn v2_policy_query<B>(&self, system: &str, body: &B) -> Result<Payload, Error>
    where
        B: Serialize + ?Sized,
    {
        let path = format!("/api/v2/policy/systems/{}/query/", system_segment(system));
        self.request_map(Endpoint::V2PolicyQuery, &path, body).await
    }

    /// Queries the policies of several actions.
    pub async fn policy_query_by_actions<B>(&self, body: &B) -> Result<Vec<Payload>, Error>
    where
        B: Serialize + ?Sized,
    {
        self.request_list(
            Endpoint::PolicyQueryByActions,
            "/api/v1/policy/query_by_actions",
            body,
        )
        .await
    }

    /// Queries the policies of several actions in `system` (v2 API).
    pub async fn v2_policy_query_by_actions<B>(
        &self,
        system: &str,
        body: &B,
    ) -> Result<Vec<Payload>, Error>
    where
        B: Serialize + ?Sized,
    {
        let path = format!(
            "/api/v2/policy/systems/{}/query_by_actions/",
            system_segment(system)
        );
        self.request_list(Endpoint::V2PolicyQueryByActions, &path, body)
            .await
    }

    /// Asks the backend for an authorization decision.
    pub async fn policy_auth<B>(&self, body: &B) -> Result<Payload, Error>
    where
        B: Serialize + ?Sized,
    {
        self.request_map(Endpoint::PolicyAuth, "/api/v1/policy/auth", body)
            .await
    }

    /// Asks the backend for an authorization decision in `system` (v2 API).
    pub async fn v2_policy_auth<B>(&self, system: &str, body: &B) -> Result<Payload, Error>
    where
        B: Serialize + ?Sized,
    {
        let path = format!("/api/v2/policy/systems/{}/auth/", system_segment(system));
        self.request_map(Endpoint::V2PolicyAuth, &path, body).await
    }

    /// Authorizes one action against several resources.
    pub async fn policy_auth_by_resources<B>(&self, body: &B) -> Result<Payload, Error>
    where
        B: Serialize + ?Sized,
    {
        self.request_map(
            Endpoint::PolicyAuthByResources,
            "/api/v1/policy/auth_by_resources",
            body,
        )
        .await
    }

    /// Authorizes several actions against one resource.
    pub async fn policy_auth_by_actions<B>(&self, body: &B) -> Result<Payload, Error>
    where
        B: Serialize + ?Sized,
    {
        self.request_map(
            Endpoint::PolicyAuthByActions,
            "/api/v1/policy/auth_by_actions",
            body,
        )
        .await
    }

    /// Returns one policy of the configured system.
    pub async fn policy_get(&self, policy_id: i64) -> Result<Payload, Error> {
        let path = format!(
            "/api/v1/systems/{}/policies/{}",
            system_segment(self.system()),
            policy_id
        );
        self.request_map(Endpoint::PolicyGet, &path, &Payload::new())
            .await
    }

    /// Lists the policies of the configured system; `query` is sent as the
    /// query string (e.g. `{"action_id": "view", "page": 1}`).
    pub async fn policy_list<B>(&self, query: &B) -> Result<Payload, Error>
    where
        B: Serialize + ?Sized,
    {
        let path = format!(
            "/api/v1/systems/{}/policies",
            system_segment(self.system())
        );
        self.request_map(Endpoint::PolicyList, &path, query).await
    }

    /// Returns the subject of each policy in `policy_ids`.
    ///
    /// The ids travel as one comma-joined `ids` query parameter.
    pub async fn policy_subjects(&self, policy_ids: &[i64]) -> Result<Vec<Payload>, Error> {
        let path = format!(
            "/api/v1/systems/{}/policies/-/subjects",
            system_segment(self.system())
        );
        let query = SubjectsQuery {
            ids: join_ids(policy_ids),
        };
        self.request_list(Endpoint::PolicySubjects, &path, &query)
            .await
    }

    /// Generates the URL where a user can apply for missing permissions.
    ///
    /// Fails with [`ErrorKind::MissingField`](crate::ErrorKind::MissingField)
    /// if the response has no `url`, and
    /// [`ErrorKind::InvalidField`](crate::ErrorKind::InvalidField) if it is
    /// not a string.
    pub async fn get_apply_url<B>(&self, body: &B) -> Result<String, Error>
    where
        B: Serialize + ?Sized,
    {
        let data = self
            .request_map(Endpoint::GetApplyUrl, "/api/v1/open/application/", body)
            .await?;
        Ok(payload_str(&data, "url")?.to_string())
    }

    // `data: null` decodes as an empty mapping / list.
    async fn request_map<B>(
        &self,
        endpoint: Endpoint,
        path: &str,
        body: &B,
    ) -> Result<Payload, Error>
    where
        B: Serialize + ?Sized,
    {
        tracing::trace!(endpoint = endpoint.as_str(), path, "calling iam backend");
        let data: Option<Payload> = self
            .inner
            .dispatcher
            .call_endpoint(endpoint, path, body, ENDPOINT_TIMEOUT)
            .await?;
        Ok(data.unwrap_or_default())
    }

    async fn request_list<B>(
        &self,
        endpoint: Endpoint,
        path: &str,
        body: &B,
    ) -> Result<Vec<Payload>, Error>
    where
        B: Serialize + ?Sized,
    {
        tracing::trace!(endpoint = endpoint.as_str(), path, "calling iam backend");
        let data: Option<Vec<Payload>> = self
            .inner
            .dispatcher
            .call_endpoint(endpoint, path, body, ENDPOINT_TIMEOUT)
            .await?;
        Ok(data.unwrap_or_default())
    }
}
