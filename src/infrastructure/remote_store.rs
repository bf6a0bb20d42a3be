//! HTTP client for the remote blob store.
//!
//! The wire contract is a single endpoint keyed by `userId` query
//! parameter: GET returns `{"data": <document|null>}`, POST takes
//! `{"data": <document>}` and overwrites wholesale, DELETE removes the
//! document. Anything other than a 2xx with a well-formed body is a
//! `StorageError::Remote`.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::{RemoteStore, StorageError};
use crate::models::document::UserDocument;

pub struct HttpRemoteStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemoteStore {
    /// `base_url` points at the API root, e.g. "http://localhost:8000/api".
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn blob_url(&self) -> String {
        format!("{}/blob", self.base_url)
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn fetch(&self, user_id: &str) -> Result<Option<UserDocument>, StorageError> {
        let response = self
            .client
            .get(self.blob_url())
            .query(&[("userId", user_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::Remote(format!(
                "fetch returned {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        match body.get("data") {
            None | Some(Value::Null) => Ok(None),
            Some(data) => Ok(Some(serde_json::from_value(data.clone())?)),
        }
    }

    async fn push(&self, user_id: &str, document: &UserDocument) -> Result<(), StorageError> {
        let response = self
            .client
            .post(self.blob_url())
            .query(&[("userId", user_id)])
            .json(&json!({ "data": document }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::Remote(format!(
                "push returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<(), StorageError> {
        let response = self
            .client
            .delete(self.blob_url())
            .query(&[("userId", user_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::Remote(format!(
                "delete returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
