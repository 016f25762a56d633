//! In-memory record store.
//!
//! Stands in for the CRM: holds leave and WFH records plus a small employee
//! directory, and derives balances from the records it holds. Can be seeded
//! from a JSON document of the form `{ "employees": [...], "records": [...] }`.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use leavedesk_core::clock::{Clock, SystemClock};
use leavedesk_core::error::{LeaveDeskError, Result};
use leavedesk_core::record::{
    EmployeeProfile, LeaveBalance, RecordStatus, RecordStore, RequestRecord,
};
use leavedesk_core::request::{LeaveRequest, LeaveType, RequestKind, WfhRequest};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Initial contents of an [`InMemoryRecordStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSeed {
    pub employees: Vec<EmployeeProfile>,
    pub records: Vec<RequestRecord>,
}

impl StoreSeed {
    /// Demo directory plus one approved Christmas leave (18-22 Dec 2025) for
    /// the anonymous "Current User", used to exercise overlap detection.
    pub fn demo() -> Self {
        let employee = |id: &str, name: &str, email: &str| EmployeeProfile {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        };
        let day = |d| NaiveDate::from_ymd_opt(2025, 12, d).unwrap_or_default();

        Self {
            employees: vec![
                employee("EMP-001", "Asha Rao", "asha.rao@winfomi.com"),
                employee("EMP-002", "Karthik Subramanian", "karthik.s@winfomi.com"),
                employee("EMP-003", "Priya Natarajan", "priya.n@winfomi.com"),
            ],
            records: vec![RequestRecord {
                id: "LEAVE_1".to_string(),
                kind: RequestKind::Leave,
                employee_name: "Current User".to_string(),
                employee_email: None,
                employee_id: None,
                leave_type: Some(LeaveType::Annual),
                start_date: day(18),
                end_date: day(22),
                reason: "Christmas vacation".to_string(),
                status: RecordStatus::Approved,
                duration_days: 5.0,
                is_half_day: false,
                created_at: Utc::now(),
            }],
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    records: Vec<RequestRecord>,
    employees: Vec<EmployeeProfile>,
    /// Shared by LEAVE_n and WFH_n ids
    next_id: u64,
}

impl StoreState {
    fn from_seed(seed: StoreSeed) -> Self {
        let next_id = seed
            .records
            .iter()
            .filter_map(|record| record.id.rsplit('_').next()?.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            records: seed.records,
            employees: seed.employees,
            next_id,
        }
    }

    fn allocate_id(&mut self, kind: RequestKind) -> String {
        let id = match kind {
            RequestKind::Leave => format!("LEAVE_{}", self.next_id),
            RequestKind::Wfh => format!("WFH_{}", self.next_id),
        };
        self.next_id += 1;
        id
    }

    /// Days of `leave_type` held by active leave records of the owner.
    fn used_days(&self, email: Option<&str>, leave_type: LeaveType) -> f64 {
        self.records
            .iter()
            .filter(|record| record.is_leave() && record.status.is_active())
            .filter(|record| record.leave_type == Some(leave_type))
            .filter(|record| match email {
                Some(email) => record.belongs_to(email),
                None => record.employee_email.is_none(),
            })
            .map(|record| record.duration_days)
            .sum()
    }
}

/// [`RecordStore`] holding everything in memory.
pub struct InMemoryRecordStore {
    state: Arc<RwLock<StoreState>>,
    clock: Arc<dyn Clock>,
    /// Addresses in this domain are registered on first lookup
    open_domain: Option<String>,
}

impl InMemoryRecordStore {
    /// Creates an empty store.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::from_seed(StoreSeed::default(), clock)
    }

    pub fn from_seed(seed: StoreSeed, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::from_seed(seed))),
            clock,
            open_domain: None,
        }
    }

    /// Store preloaded with [`StoreSeed::demo`].
    pub fn demo(clock: Arc<dyn Clock>) -> Self {
        Self::from_seed(StoreSeed::demo(), clock)
    }

    /// Reads a JSON seed file.
    pub async fn load_seed(path: &Path, clock: Arc<dyn Clock>) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let seed: StoreSeed = serde_json::from_str(&content)?;
        info!(
            path = %path.display(),
            employees = seed.employees.len(),
            records = seed.records.len(),
            "record store seeded"
        );
        Ok(Self::from_seed(seed, clock))
    }

    /// Registers unknown addresses of `domain` on lookup, deriving a display
    /// name from the local part (`john.doe@…` → "John Doe").
    pub fn with_open_directory(mut self, domain: impl Into<String>) -> Self {
        self.open_domain = Some(domain.into().to_lowercase());
        self
    }

    /// Every record, oldest first.
    pub async fn all_records(&self) -> Vec<RequestRecord> {
        self.state.read().await.records.clone()
    }

    pub async fn employees(&self) -> Vec<EmployeeProfile> {
        self.state.read().await.employees.clone()
    }

    fn open_profile(&self, email: &str, next_number: usize) -> Option<EmployeeProfile> {
        let domain = self.open_domain.as_deref()?;
        let (local, address_domain) = email.split_once('@')?;
        if local.is_empty() || address_domain != domain {
            return None;
        }
        Some(EmployeeProfile {
            id: format!("EMP-{:03}", next_number),
            name: friendly_name(local),
            email: email.to_string(),
        })
    }

    async fn insert(&self, mut record: RequestRecord) -> RequestRecord {
        let mut state = self.state.write().await;
        record.id = state.allocate_id(record.kind);
        state.records.push(record.clone());
        record
    }
}

/// `john.doe_smith` → "John Doe Smith".
fn friendly_name(local: &str) -> String {
    local
        .split(['.', '_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create_leave_record(
        &self,
        employee: Option<&EmployeeProfile>,
        request: &LeaveRequest,
    ) -> Result<RequestRecord> {
        let record = self
            .insert(RequestRecord {
                id: String::new(),
                kind: RequestKind::Leave,
                employee_name: request.employee_name.clone(),
                employee_email: employee.map(|e| e.email.clone()),
                employee_id: employee.map(|e| e.id.clone()),
                leave_type: Some(request.leave_type),
                start_date: request.start_date,
                end_date: request.end_date,
                reason: request.reason.clone(),
                status: RecordStatus::Pending,
                duration_days: request.duration_days,
                is_half_day: request.is_half_day,
                created_at: self.clock.now(),
            })
            .await;
        info!(record_id = %record.id, employee = %record.employee_name, "leave record created");
        Ok(record)
    }

    async fn create_wfh_record(
        &self,
        employee: Option<&EmployeeProfile>,
        request: &WfhRequest,
    ) -> Result<RequestRecord> {
        let record = self
            .insert(RequestRecord {
                id: String::new(),
                kind: RequestKind::Wfh,
                employee_name: request.employee_name.clone(),
                employee_email: employee.map(|e| e.email.clone()),
                employee_id: employee.map(|e| e.id.clone()),
                leave_type: None,
                start_date: request.date,
                end_date: request.date,
                reason: request.reason.clone(),
                status: RecordStatus::Pending,
                duration_days: 1.0,
                is_half_day: false,
                created_at: self.clock.now(),
            })
            .await;
        info!(record_id = %record.id, employee = %record.employee_name, "wfh record created");
        Ok(record)
    }

    async fn check_leave_overlap(
        &self,
        employee_name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RequestRecord>> {
        let state = self.state.read().await;
        let overlapping: Vec<RequestRecord> = state
            .records
            .iter()
            .filter(|record| record.is_leave())
            .filter(|record| record.employee_name.eq_ignore_ascii_case(employee_name))
            .filter(|record| record.overlaps(start, end))
            .cloned()
            .collect();
        debug!(%employee_name, %start, %end, found = overlapping.len(), "overlap query");
        Ok(overlapping)
    }

    async fn check_leave_balance(
        &self,
        email: Option<&str>,
        leave_type: LeaveType,
        requested_days: f64,
    ) -> Result<LeaveBalance> {
        let state = self.state.read().await;
        let balance = LeaveBalance::new(
            leave_type,
            leave_type.entitlement_days(),
            state.used_days(email, leave_type),
        );
        debug!(%leave_type, requested_days, remaining = balance.remaining, "balance query");
        Ok(balance)
    }

    async fn get_leave_balance(&self, email: Option<&str>) -> Result<Vec<LeaveBalance>> {
        let state = self.state.read().await;
        Ok(LeaveType::iter()
            .map(|leave_type| {
                LeaveBalance::new(
                    leave_type,
                    leave_type.entitlement_days(),
                    state.used_days(email, leave_type),
                )
            })
            .collect())
    }

    async fn lookup_user_by_email(&self, email: &str) -> Result<Option<EmployeeProfile>> {
        let email = email.trim().to_lowercase();
        {
            let state = self.state.read().await;
            if let Some(profile) = state
                .employees
                .iter()
                .find(|profile| profile.email.eq_ignore_ascii_case(&email))
            {
                return Ok(Some(profile.clone()));
            }
        }

        let mut state = self.state.write().await;
        let Some(profile) = self.open_profile(&email, state.employees.len() + 1) else {
            debug!(%email, "email not in directory");
            return Ok(None);
        };
        info!(%email, name = %profile.name, "employee registered");
        state.employees.push(profile.clone());
        Ok(Some(profile))
    }

    async fn get_record(&self, record_id: &str) -> Result<Option<RequestRecord>> {
        let state = self.state.read().await;
        Ok(state
            .records
            .iter()
            .find(|record| record.id.eq_ignore_ascii_case(record_id))
            .cloned())
    }

    async fn update_record_status(
        &self,
        record_id: &str,
        status: RecordStatus,
    ) -> Result<RequestRecord> {
        let mut state = self.state.write().await;
        let record = state
            .records
            .iter_mut()
            .find(|record| record.id.eq_ignore_ascii_case(record_id))
            .ok_or_else(|| LeaveDeskError::not_found("record", record_id))?;
        record.status = status;
        info!(record_id = %record.id, %status, "record status updated");
        Ok(record.clone())
    }

    async fn list_requests_by_email(&self, email: &str) -> Result<Vec<RequestRecord>> {
        let state = self.state.read().await;
        let mut records: Vec<RequestRecord> = state
            .records
            .iter()
            .filter(|record| record.belongs_to(email))
            .cloned()
            .collect();
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
