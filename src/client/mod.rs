use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::models::employee::{Employee, EmployeeInput};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct DeleteAck {
    pub message: String,
}

/// REST calls the grid makes. One call per user action.
#[async_trait]
pub trait EmployeeApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Employee>, ApiError>;
    async fn create(&self, input: &EmployeeInput) -> Result<Employee, ApiError>;
    async fn update(&self, id: i32, input: &EmployeeInput) -> Result<Employee, ApiError>;
    async fn delete(&self, id: i32) -> Result<DeleteAck, ApiError>;
}

pub struct HttpEmployeeApi {
    client: Client,
    base_url: Url,
}

impl HttpEmployeeApi {
    pub fn new(mut base_url: Url) -> Self {
        // `join` drops the last path segment unless it ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn employees_url(&self) -> Result<Url, ApiError> {
        Ok(self.base_url.join("employees")?)
    }

    fn employee_url(&self, id: i32) -> Result<Url, ApiError> {
        Ok(self.base_url.join(&format!("employees/{id}"))?)
    }
}

async fn check(res: Response) -> Result<Response, ApiError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(ApiError::Status { status, body })
}

#[async_trait]
impl EmployeeApi for HttpEmployeeApi {
    async fn list(&self) -> Result<Vec<Employee>, ApiError> {
        let res = self.client.get(self.employees_url()?).send().await?;
        Ok(check(res).await?.json().await?)
    }

    async fn create(&self, input: &EmployeeInput) -> Result<Employee, ApiError> {
        let res = self
            .client
            .post(self.employees_url()?)
            .json(input)
            .send()
            .await?;
        Ok(check(res).await?.json().await?)
    }

    async fn update(&self, id: i32, input: &EmployeeInput) -> Result<Employee, ApiError> {
        let res = self
            .client
            .put(self.employee_url(id)?)
            .json(input)
            .send()
            .await?;
        Ok(check(res).await?.json().await?)
    }

    async fn delete(&self, id: i32) -> Result<DeleteAck, ApiError> {
        let res = self.client.delete(self.employee_url(id)?).send().await?;
        Ok(check(res).await?.json().await?)
    }
}
