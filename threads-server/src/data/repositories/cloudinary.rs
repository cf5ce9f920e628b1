use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};

use crate::data::asset_store::{AssetStore, UploadedAsset};
use crate::domain::error::DomainError;
use crate::infrastructure::settings::AssetStoreSettings;

#[derive(Debug, Error)]
pub(crate) enum AssetStoreError {
    #[error("asset store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("asset store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl From<AssetStoreError> for DomainError {
    fn from(err: AssetStoreError) -> Self {
        DomainError::Unexpected(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Cloudinary-compatible image store driven through its signed upload API.
#[derive(Debug, Clone)]
pub(crate) struct CloudinaryAssetStore {
    client: reqwest::Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: Option<String>,
}

impl CloudinaryAssetStore {
    pub(crate) fn new(settings: &AssetStoreSettings) -> Result<Self, AssetStoreError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        info!(cloud_name = %settings.cloud_name, "asset store client initialized");

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            cloud_name: settings.cloud_name.clone(),
            api_key: settings.api_key.clone(),
            api_secret: settings.api_secret.clone(),
            folder: settings.folder.clone(),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{action}",
            self.base_url.trim_end_matches('/'),
            self.cloud_name
        )
    }

    /// Signs every parameter except `file` and `api_key`, sorted by name.
    fn sign(&self, params: &[(&str, String)]) -> String {
        hex::encode(Sha256::digest(
            string_to_sign(params, &self.api_secret).as_bytes(),
        ))
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        action: &str,
        mut signed: Vec<(&'static str, String)>,
        unsigned: Vec<(&'static str, String)>,
    ) -> Result<T, AssetStoreError> {
        signed.push(("timestamp", Utc::now().timestamp().to_string()));
        let signature = self.sign(&signed);

        let mut form = signed;
        form.extend(unsigned);
        form.push(("api_key", self.api_key.clone()));
        form.push(("signature", signature));
        form.push(("signature_algorithm", "sha256".to_string()));

        let response = self
            .client
            .post(self.endpoint(action))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => format!("http status {status}"),
            };
            return Err(AssetStoreError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

fn string_to_sign(params: &[(&str, String)], secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{joined}{secret}")
}

#[async_trait]
impl AssetStore for CloudinaryAssetStore {
    async fn upload(&self, payload: &str) -> Result<UploadedAsset, DomainError> {
        let mut signed = Vec::new();
        if let Some(folder) = &self.folder {
            signed.push(("folder", folder.clone()));
        }

        let uploaded: UploadResponse = self
            .post_form("upload", signed, vec![("file", payload.to_string())])
            .await?;

        debug!(asset_id = %uploaded.public_id, "asset uploaded");
        Ok(UploadedAsset {
            url: uploaded.secure_url,
            asset_id: uploaded.public_id,
        })
    }

    async fn delete(&self, asset_id: &str) -> Result<(), DomainError> {
        let destroyed: DestroyResponse = self
            .post_form("destroy", vec![("public_id", asset_id.to_string())], Vec::new())
            .await?;

        // "not found" means there is nothing left to clean up
        match destroyed.result.as_str() {
            "ok" | "not found" => {
                debug!(asset_id, result = %destroyed.result, "asset destroyed");
                Ok(())
            }
            other => Err(AssetStoreError::Rejected {
                status: 200,
                message: format!("unexpected destroy result: {other}"),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CloudinaryAssetStore, string_to_sign};
    use crate::data::asset_store::AssetStore;
    use crate::infrastructure::settings::AssetStoreSettings;

    fn settings() -> AssetStoreSettings {
        AssetStoreSettings {
            base_url: "https://api.cloudinary.com/".to_string(),
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            folder: None,
            timeout_secs: 5,
        }
    }

    #[test]
    fn string_to_sign_sorts_params_and_appends_secret() {
        let params = vec![
            ("timestamp", "1700000000".to_string()),
            ("public_id", "abc123".to_string()),
        ];
        assert_eq!(
            string_to_sign(&params, "secret"),
            "public_id=abc123&timestamp=1700000000secret"
        );
    }

    #[test]
    fn signature_is_hex_sha256() {
        let store = CloudinaryAssetStore::new(&settings()).expect("client must build");
        let signature = store.sign(&[("public_id", "abc123".to_string())]);
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn transport_failure_keeps_underlying_cause() {
        let store = CloudinaryAssetStore::new(&AssetStoreSettings {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 1,
            ..settings()
        })
        .expect("client must build");

        let err = store
            .upload("data:image/png;base64,AAAA")
            .await
            .expect_err("nothing listens on port 1");
        let message = err.to_string();
        let (_, cause) = message
            .split_once("asset store request failed: ")
            .expect("prefix must be present");
        assert!(!cause.trim().is_empty(), "{message}");
    }

    #[test]
    fn endpoint_targets_cloud_and_action() {
        let store = CloudinaryAssetStore::new(&settings()).expect("client must build");
        assert_eq!(
            store.endpoint("destroy"),
            "https://api.cloudinary.com/v1_1/demo/image/destroy"
        );
    }
}
