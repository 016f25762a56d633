//! Record store trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{EmployeeProfile, LeaveBalance, RecordStatus, RequestRecord};
use crate::error::Result;
use crate::request::{LeaveRequest, LeaveType, WfhRequest};

/// Persistence for leave and WFH records, plus the employee directory.
///
/// The conversation engine only ever talks to the store through this
/// trait; a CRM-backed implementation would live next to the in-memory one.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Creates a leave record in `Pending` status.
    ///
    /// # Arguments
    ///
    /// * `employee` - Verified employee, if the session has one
    /// * `request` - The confirmed leave request
    async fn create_leave_record(
        &self,
        employee: Option<&EmployeeProfile>,
        request: &LeaveRequest,
    ) -> Result<RequestRecord>;

    /// Creates a WFH record in `Pending` status.
    async fn create_wfh_record(
        &self,
        employee: Option<&EmployeeProfile>,
        request: &WfhRequest,
    ) -> Result<RequestRecord>;

    /// Returns leave records of `employee_name` intersecting `[start, end]`.
    ///
    /// Rejected and cancelled records are included; callers decide what
    /// counts as a conflict.
    async fn check_leave_overlap(
        &self,
        employee_name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RequestRecord>>;

    /// Balance of `leave_type` for the employee behind `email`.
    ///
    /// # Arguments
    ///
    /// * `email` - Verified email, `None` for an anonymous session
    /// * `leave_type` - The leave type being requested
    /// * `requested_days` - Days the caller intends to take
    async fn check_leave_balance(
        &self,
        email: Option<&str>,
        leave_type: LeaveType,
        requested_days: f64,
    ) -> Result<LeaveBalance>;

    /// Balances of every leave type.
    async fn get_leave_balance(&self, email: Option<&str>) -> Result<Vec<LeaveBalance>>;

    /// # Returns
    ///
    /// - `Ok(Some(profile))`: Employee found
    /// - `Ok(None)`: No employee with that email
    /// - `Err(_)`: Directory unavailable
    async fn lookup_user_by_email(&self, email: &str) -> Result<Option<EmployeeProfile>>;

    async fn get_record(&self, record_id: &str) -> Result<Option<RequestRecord>>;

    /// Fails with `NotFound` when the id is unknown.
    async fn update_record_status(
        &self,
        record_id: &str,
        status: RecordStatus,
    ) -> Result<RequestRecord>;

    /// Leave and WFH records owned by `email`, oldest first.
    async fn list_requests_by_email(&self, email: &str) -> Result<Vec<RequestRecord>>;
}
