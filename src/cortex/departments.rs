//! Department endpoints
//!
//! Departments are addressed by the `departmentTag` query parameter rather
//! than a path segment.

use super::client::CortexClient;
use super::error::ApiResult;
use super::http::Body;
use super::routes::Domain;
use crate::catalog::department::{Department, DepartmentList};

pub struct Departments<'a> {
    client: &'a CortexClient,
}

impl<'a> Departments<'a> {
    pub fn new(client: &'a CortexClient) -> Self {
        Self { client }
    }

    fn url(&self) -> String {
        self.client.url(Domain::Departments, "")
    }

    pub async fn get(&self, tag: &str) -> ApiResult<Department> {
        self.client
            .http()
            .get_json(&self.url(), &[("departmentTag", tag)])
            .await
    }

    pub async fn list(&self) -> ApiResult<Vec<Department>> {
        let list: DepartmentList = self.client.http().get_json(&self.url(), &[]).await?;
        Ok(list.departments)
    }

    pub async fn create(&self, department: &Department) -> ApiResult<Department> {
        self.client
            .http()
            .post(&self.url(), Body::json(department)?)
            .await
    }

    pub async fn update(&self, department: &Department) -> ApiResult<Department> {
        self.client
            .http()
            .put(
                &self.url(),
                &[("departmentTag", department.department_tag.as_str())],
                Body::json(department)?,
            )
            .await
    }

    pub async fn delete(&self, tag: &str) -> ApiResult<()> {
        self.client
            .http()
            .delete(&self.url(), &[("departmentTag", tag)])
            .await
    }
}
