//! Iceberg REST catalog operations, scoped to one warehouse.
//!
//! The catalog API addresses a warehouse through a prefix path segment of
//! the form `{project-id}/{warehouse-name}`, percent-encoded as a single
//! segment.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::{LakekeeperClient, ProjectId, error::Result};

/// Everything outside unreserved URI characters is escaped, notably `/`.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'\\')
    .add(b'^')
    .add(b'|');

pub(crate) fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

#[derive(Debug, Serialize)]
struct CreateNamespaceRequest<'a> {
    namespace: Vec<&'a str>,
    properties: std::collections::HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ListNamespacesResponse {
    #[serde(default)]
    namespaces: Vec<Vec<String>>,
}

/// Handle to the Iceberg catalog of one warehouse.
#[derive(Debug)]
pub struct CatalogV1<'a> {
    client: &'a LakekeeperClient,
    prefix: String,
}

impl LakekeeperClient {
    /// Catalog handle for `warehouse_name` inside `project_id`.
    #[must_use]
    pub fn catalog_v1(&self, project_id: &ProjectId, warehouse_name: &str) -> CatalogV1<'_> {
        CatalogV1 {
            client: self,
            prefix: encode_path_segment(&format!("{project_id}/{warehouse_name}")),
        }
    }
}

impl CatalogV1<'_> {
    fn namespace_path(&self, namespace: &str) -> String {
        format!(
            "/catalog/v1/{}/namespaces/{}",
            self.prefix,
            encode_path_segment(namespace)
        )
    }

    /// `POST /catalog/v1/{prefix}/namespaces`
    pub async fn create_namespace(&self, namespace: &str) -> Result<()> {
        let request = CreateNamespaceRequest {
            namespace: vec![namespace],
            properties: std::collections::HashMap::new(),
        };
        self.client
            .send_unit(
                "create namespace",
                self.client
                    .post(&format!("/catalog/v1/{}/namespaces", self.prefix))
                    .json(&request),
            )
            .await
    }

    /// `HEAD /catalog/v1/{prefix}/namespaces/{namespace}`
    ///
    /// Returns `false` on 404 instead of erroring.
    pub async fn namespace_exists(&self, namespace: &str) -> Result<bool> {
        let status = self
            .client
            .send_status(
                "check namespace exists",
                self.client.head(&self.namespace_path(namespace)),
                &[http::StatusCode::NOT_FOUND],
            )
            .await?;
        Ok(status != http::StatusCode::NOT_FOUND)
    }

    /// `DELETE /catalog/v1/{prefix}/namespaces/{namespace}`
    pub async fn drop_namespace(&self, namespace: &str) -> Result<()> {
        self.client
            .send_unit(
                "drop namespace",
                self.client.delete(&self.namespace_path(namespace)),
            )
            .await
    }

    /// `GET /catalog/v1/{prefix}/namespaces` — top-level namespaces.
    pub async fn list_namespaces(&self) -> Result<Vec<String>> {
        let response: ListNamespacesResponse = self
            .client
            .send_json(
                "list namespaces",
                self.client
                    .get(&format!("/catalog/v1/{}/namespaces", self.prefix)),
            )
            .await?;
        Ok(response
            .namespaces
            .into_iter()
            .filter_map(|parts| parts.into_iter().next())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::config::ClientConfig;

    fn client() -> LakekeeperClient {
        LakekeeperClient::new(
            &ClientConfig::builder()
                .base_url("https://catalog.example.com".parse().unwrap())
                .auth_url("https://idp.example.com/token".parse().unwrap())
                .client_id("provider")
                .client_secret("secret")
                .build(),
        )
        .unwrap()
    }

    #[test]
    fn prefix_encodes_slash_as_single_segment() {
        let client = client();
        let project = ProjectId::from_str("00000000-0000-0000-0000-000000000000").unwrap();
        let catalog = client.catalog_v1(&project, "my warehouse");
        assert_eq!(
            catalog.prefix,
            "00000000-0000-0000-0000-000000000000%2Fmy%20warehouse"
        );
    }

    #[test]
    fn namespace_path_escapes_name() {
        let client = client();
        let project = ProjectId::from_str("p1").unwrap();
        let catalog = client.catalog_v1(&project, "wh");
        assert_eq!(
            catalog.namespace_path("sales 2025"),
            "/catalog/v1/p1%2Fwh/namespaces/sales%202025"
        );
    }
}
