//! Employee Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Colleague as listed by the employee and search endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub employee_id: String,
    pub full_name: String,
}

/// The authenticated user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeContext {
    pub id: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeesRequest {
    pub days_to_share: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeesResponse {
    #[serde(default)]
    pub employees_or_null: Option<Vec<EmployeeRecord>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchColleagueRequest {
    pub full_name_query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchColleagueResponse {
    #[serde(default)]
    pub found_employees: Vec<EmployeeRecord>,
}
