use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{
    LakekeeperClient, ProjectId, WarehouseId,
    api::storage::{StorageCredential, StorageProfile, TabularDeleteProfile},
    client::X_PROJECT_ID_HEADER,
    error::Result,
};

#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WarehouseStatus {
    Active,
    Inactive,
}

impl WarehouseStatus {
    #[must_use]
    pub fn is_active(self) -> bool {
        self == WarehouseStatus::Active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "kebab-case")]
pub struct CreateWarehouseRequest {
    /// Name of the warehouse to create. Must be unique within a project
    /// and may not contain "/".
    #[builder(setter(into))]
    pub warehouse_name: String,
    /// Storage profile to use for the warehouse.
    pub storage_profile: StorageProfile,
    /// Optional storage credential to use for the warehouse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub storage_credential: Option<StorageCredential>,
    /// Profile to determine behavior upon dropping of tabulars.
    /// Default: hard deletion.
    #[serde(default)]
    #[builder(default)]
    pub delete_profile: TabularDeleteProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GetWarehouseResponse {
    /// ID of the warehouse.
    pub warehouse_id: WarehouseId,
    /// Name of the warehouse.
    pub name: String,
    /// Project ID in which the warehouse was created.
    pub project_id: ProjectId,
    /// Storage profile used for the warehouse. Credentials are never
    /// echoed back.
    pub storage_profile: StorageProfile,
    /// Delete profile used for the warehouse.
    #[serde(default)]
    pub delete_profile: TabularDeleteProfile,
    /// Whether the warehouse is active.
    pub status: WarehouseStatus,
    /// Whether the warehouse is protected from being deleted.
    #[serde(default)]
    pub protected: bool,
    /// Last updated timestamp.
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListWarehousesResponse {
    /// List of warehouses in the project.
    pub warehouses: Vec<GetWarehouseResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RenameWarehouseRequest {
    /// New name for the warehouse.
    pub new_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SetWarehouseProtectionRequest {
    pub protected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProtectionResponse {
    pub protected: bool,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateWarehouseDeleteProfileRequest {
    pub delete_profile: TabularDeleteProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateWarehouseStorageRequest {
    /// Storage profile to use for the warehouse. The new profile must
    /// point to the same location as the existing profile to avoid data
    /// loss.
    pub storage_profile: StorageProfile,
    /// Storage credential for the new profile. The existing credential
    /// is not re-used.
    #[serde(default)]
    pub storage_credential: Option<StorageCredential>,
}

impl LakekeeperClient {
    /// `POST /management/v1/warehouse` scoped via the `x-project-id`
    /// header.
    pub async fn create_warehouse(
        &self,
        project_id: &ProjectId,
        request: &CreateWarehouseRequest,
    ) -> Result<GetWarehouseResponse> {
        self.send_json(
            "create warehouse",
            self.post("/management/v1/warehouse")
                .header(X_PROJECT_ID_HEADER, project_id.as_str())
                .json(request),
        )
        .await
    }

    /// `GET /management/v1/warehouse/{warehouse_id}`
    pub async fn get_warehouse(&self, warehouse_id: WarehouseId) -> Result<GetWarehouseResponse> {
        self.send_json(
            "get warehouse",
            self.get(&format!("/management/v1/warehouse/{warehouse_id}")),
        )
        .await
    }

    /// `GET /management/v1/warehouse`
    pub async fn list_warehouses(
        &self,
        project_id: &ProjectId,
        status: Option<&[WarehouseStatus]>,
    ) -> Result<ListWarehousesResponse> {
        let mut builder = self
            .get("/management/v1/warehouse")
            .header(X_PROJECT_ID_HEADER, project_id.as_str());
        if let Some(status) = status {
            for s in status {
                builder = builder.query(&[("warehouseStatus", s.to_string())]);
            }
        }
        self.send_json("list warehouses", builder).await
    }

    /// `POST /management/v1/warehouse/{warehouse_id}/rename`
    pub async fn rename_warehouse(&self, warehouse_id: WarehouseId, new_name: &str) -> Result<()> {
        let request = RenameWarehouseRequest {
            new_name: new_name.to_string(),
        };
        self.send_unit(
            "rename warehouse",
            self.post(&format!("/management/v1/warehouse/{warehouse_id}/rename"))
                .json(&request),
        )
        .await
    }

    /// `POST /management/v1/warehouse/{warehouse_id}/protection`
    pub async fn set_warehouse_protection(
        &self,
        warehouse_id: WarehouseId,
        protected: bool,
    ) -> Result<ProtectionResponse> {
        self.send_json(
            "set warehouse protection",
            self.post(&format!(
                "/management/v1/warehouse/{warehouse_id}/protection"
            ))
            .json(&SetWarehouseProtectionRequest { protected }),
        )
        .await
    }

    /// `POST /management/v1/warehouse/{warehouse_id}/activate`
    pub async fn activate_warehouse(&self, warehouse_id: WarehouseId) -> Result<()> {
        self.send_unit(
            "activate warehouse",
            self.post(&format!("/management/v1/warehouse/{warehouse_id}/activate")),
        )
        .await
    }

    /// `POST /management/v1/warehouse/{warehouse_id}/deactivate`
    pub async fn deactivate_warehouse(&self, warehouse_id: WarehouseId) -> Result<()> {
        self.send_unit(
            "deactivate warehouse",
            self.post(&format!(
                "/management/v1/warehouse/{warehouse_id}/deactivate"
            )),
        )
        .await
    }

    /// `POST /management/v1/warehouse/{warehouse_id}/delete-profile`
    pub async fn update_warehouse_delete_profile(
        &self,
        warehouse_id: WarehouseId,
        delete_profile: TabularDeleteProfile,
    ) -> Result<()> {
        self.send_unit(
            "update warehouse delete profile",
            self.post(&format!(
                "/management/v1/warehouse/{warehouse_id}/delete-profile"
            ))
            .json(&UpdateWarehouseDeleteProfileRequest { delete_profile }),
        )
        .await
    }

    /// `POST /management/v1/warehouse/{warehouse_id}/storage`
    ///
    /// Profile and credential are always sent together; the server does
    /// not keep the previous credential.
    pub async fn update_warehouse_storage(
        &self,
        warehouse_id: WarehouseId,
        storage_profile: StorageProfile,
        storage_credential: Option<StorageCredential>,
    ) -> Result<()> {
        self.send_unit(
            "update warehouse storage",
            self.post(&format!("/management/v1/warehouse/{warehouse_id}/storage"))
                .json(&UpdateWarehouseStorageRequest {
                    storage_profile,
                    storage_credential,
                }),
        )
        .await
    }

    /// `DELETE /management/v1/warehouse/{warehouse_id}?force=`
    pub async fn delete_warehouse(&self, warehouse_id: WarehouseId, force: bool) -> Result<()> {
        self.send_unit(
            "delete warehouse",
            self.delete(&format!("/management/v1/warehouse/{warehouse_id}"))
                .query(&[("force", force)]),
        )
        .await
    }
}
