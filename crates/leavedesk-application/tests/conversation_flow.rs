use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use leavedesk_application::{ChatService, ConversationMachine, SessionCache};
use leavedesk_core::assistant::GeneralAssistant;
use leavedesk_core::chat::{ChatRequest, ChatResponse, EditDetails, IntentOverride, ReplyIntent};
use leavedesk_core::clock::{Clock, FixedClock};
use leavedesk_core::config::LeaveDeskConfig;
use leavedesk_core::error::{LeaveDeskError, Result};
use leavedesk_core::extract::Confirmation;
use leavedesk_core::holiday::{Holiday, HolidayCalendar, HolidayRepository};
use leavedesk_core::record::{
    EmployeeProfile, LeaveBalance, RecordStatus, RecordStore, RequestRecord,
};
use leavedesk_core::request::{LeaveRequest, LeaveType, PendingRequest, RequestKind, WfhRequest};
use leavedesk_core::session::{HistoryEntry, SessionContext};
use leavedesk_infrastructure::{InMemoryRecordStore, StoreSeed};
use std::sync::{Arc, Mutex};

const SESSION: &str = "test-session";
const EMAIL: &str = "asha.rao@winfomi.com";

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, day).unwrap()
}

struct EchoAssistant;

#[async_trait]
impl GeneralAssistant for EchoAssistant {
    async fn answer(&self, message: &str, _history: &[HistoryEntry]) -> Result<String> {
        Ok(format!("general: {message}"))
    }
}

struct DownAssistant;

#[async_trait]
impl GeneralAssistant for DownAssistant {
    async fn answer(&self, _message: &str, _history: &[HistoryEntry]) -> Result<String> {
        Err(LeaveDeskError::collaborator("assistant", "503"))
    }
}

fn seed() -> StoreSeed {
    StoreSeed {
        employees: vec![EmployeeProfile {
            id: "EMP-001".to_string(),
            name: "Asha Rao".to_string(),
            email: EMAIL.to_string(),
        }],
        records: vec![RequestRecord {
            id: "LEAVE_1".to_string(),
            kind: RequestKind::Leave,
            employee_name: "Asha Rao".to_string(),
            employee_email: Some(EMAIL.to_string()),
            employee_id: Some("EMP-001".to_string()),
            leave_type: Some(LeaveType::Annual),
            start_date: d(18),
            end_date: d(22),
            reason: "Christmas vacation".to_string(),
            status: RecordStatus::Approved,
            duration_days: 5.0,
            is_half_day: false,
            created_at: Utc::now(),
        }],
    }
}

fn calendar() -> HolidayCalendar {
    HolidayCalendar {
        company_name: Some("Winfomi".to_string()),
        holidays: vec![Holiday {
            date: d(25),
            name: "Christmas".to_string(),
            kind: Some("Festival".to_string()),
            optional: false,
        }],
        ..Default::default()
    }
}

/// Clock the test can move forward between turns.
struct SteppingClock {
    now: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    fn on(date: NaiveDate) -> Self {
        Self {
            now: Mutex::new(FixedClock::on(date).now()),
        }
    }

    fn advance_days(&self, days: u64) {
        let mut now = self.now.lock().unwrap();
        *now = now.checked_add_days(Days::new(days)).unwrap();
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Calendar that can gain holidays mid-conversation.
struct EditableCalendar {
    calendar: Mutex<HolidayCalendar>,
}

impl EditableCalendar {
    fn declare(&self, holiday: Holiday) {
        self.calendar.lock().unwrap().holidays.push(holiday);
    }
}

#[async_trait]
impl HolidayRepository for EditableCalendar {
    async fn load_calendar(&self) -> Result<HolidayCalendar> {
        Ok(self.calendar.lock().unwrap().clone())
    }
}

/// Reads from the in-memory store but refuses to create records.
struct ReadOnlyStore {
    inner: Arc<InMemoryRecordStore>,
}

#[async_trait]
impl RecordStore for ReadOnlyStore {
    async fn create_leave_record(
        &self,
        _employee: Option<&EmployeeProfile>,
        _request: &LeaveRequest,
    ) -> Result<RequestRecord> {
        Err(LeaveDeskError::collaborator("record-store", "write refused"))
    }

    async fn create_wfh_record(
        &self,
        _employee: Option<&EmployeeProfile>,
        _request: &WfhRequest,
    ) -> Result<RequestRecord> {
        Err(LeaveDeskError::collaborator("record-store", "write refused"))
    }

    async fn check_leave_overlap(
        &self,
        employee_name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RequestRecord>> {
        self.inner.check_leave_overlap(employee_name, start, end).await
    }

    async fn check_leave_balance(
        &self,
        email: Option<&str>,
        leave_type: LeaveType,
        requested_days: f64,
    ) -> Result<LeaveBalance> {
        self.inner
            .check_leave_balance(email, leave_type, requested_days)
            .await
    }

    async fn get_leave_balance(&self, email: Option<&str>) -> Result<Vec<LeaveBalance>> {
        self.inner.get_leave_balance(email).await
    }

    async fn lookup_user_by_email(&self, email: &str) -> Result<Option<EmployeeProfile>> {
        self.inner.lookup_user_by_email(email).await
    }

    async fn get_record(&self, record_id: &str) -> Result<Option<RequestRecord>> {
        self.inner.get_record(record_id).await
    }

    async fn update_record_status(
        &self,
        record_id: &str,
        status: RecordStatus,
    ) -> Result<RequestRecord> {
        self.inner.update_record_status(record_id, status).await
    }

    async fn list_requests_by_email(&self, email: &str) -> Result<Vec<RequestRecord>> {
        self.inner.list_requests_by_email(email).await
    }
}

struct Harness {
    service: ChatService,
    records: Arc<InMemoryRecordStore>,
    clock: Arc<SteppingClock>,
    calendar: Arc<EditableCalendar>,
}

impl Harness {
    fn build(
        assistant: Arc<dyn GeneralAssistant>,
        config: LeaveDeskConfig,
        read_only: bool,
    ) -> Self {
        let clock = Arc::new(SteppingClock::on(d(10)));
        let records = Arc::new(InMemoryRecordStore::from_seed(seed(), clock.clone()));
        let calendar = Arc::new(EditableCalendar {
            calendar: Mutex::new(calendar()),
        });
        let store: Arc<dyn RecordStore> = if read_only {
            Arc::new(ReadOnlyStore {
                inner: records.clone(),
            })
        } else {
            records.clone()
        };
        let machine = ConversationMachine::new(
            store,
            calendar.clone(),
            assistant,
            clock.clone(),
            config.clone(),
        );
        let sessions = Arc::new(SessionCache::new(config.session_limits()));
        Self {
            service: ChatService::new(sessions, machine),
            records,
            clock,
            calendar,
        }
    }

    fn with_assistant(assistant: Arc<dyn GeneralAssistant>) -> Self {
        Self::build(assistant, LeaveDeskConfig::default(), false)
    }

    fn new() -> Self {
        Self::with_assistant(Arc::new(EchoAssistant))
    }

    /// Harness with a verified session.
    async fn verified() -> Self {
        Self::new().verify().await
    }

    async fn verify(self) -> Self {
        let response = self.say(&format!("my email is {EMAIL}")).await;
        assert_eq!(response.intent, ReplyIntent::EmailVerified, "{}", response.reply);
        self
    }

    async fn send(&self, request: ChatRequest) -> ChatResponse {
        self.service.handle_message(request.with_session(SESSION)).await
    }

    async fn say(&self, message: &str) -> ChatResponse {
        self.send(ChatRequest::text(message)).await
    }

    async fn session(&self) -> SessionContext {
        self.service.session(SESSION).await.unwrap().unwrap()
    }

    async fn record_count(&self) -> usize {
        self.records.all_records().await.len()
    }
}

// ============================================================================
// Verification
// ============================================================================

#[tokio::test]
async fn first_message_asks_for_email() {
    let harness = Harness::new();
    let response = harness.say("hi there").await;

    assert_eq!(response.intent, ReplyIntent::RequestEmail);
    assert!(response.reply.contains("Winfomi email"));
    let session = harness.session().await;
    assert!(session.awaiting_email);
    assert_eq!(session.email_attempts, 0);
}

#[tokio::test]
async fn verified_email_binds_employee() {
    let harness = Harness::verified().await;
    let session = harness.session().await;

    assert_eq!(session.user_email.as_deref(), Some(EMAIL));
    assert_eq!(session.employee_name.as_deref(), Some("Asha Rao"));
    assert!(!session.awaiting_email);
}

#[tokio::test]
async fn email_from_payload_is_accepted() {
    let harness = Harness::new();
    let response = harness
        .send(ChatRequest::text("hello").with_email(EMAIL))
        .await;
    assert_eq!(response.intent, ReplyIntent::EmailVerified);
    assert!(response.reply.contains("Hi Asha"));
}

#[tokio::test]
async fn unknown_address_counts_as_attempt() {
    let harness = Harness::new();
    let response = harness.say("new.joiner@winfomi.com").await;

    assert_eq!(response.intent, ReplyIntent::RequestEmail);
    assert!(response.reply.contains("not registered"));
    assert!(response.reply.contains("Attempts remaining: 2"));
    assert_eq!(harness.session().await.email_attempts, 1);
}

#[tokio::test]
async fn three_bad_emails_lock_the_session() {
    let harness = Harness::new();
    harness.say("hello").await;

    let first = harness.say("asha@gmail.com").await;
    assert!(first.reply.contains("Attempts remaining: 2"));
    harness.say("asha@yahoo.com").await;
    let third = harness.say("asha@outlook.com").await;
    assert_eq!(third.intent, ReplyIntent::EmailVerificationFailed);

    let session = harness.session().await;
    assert!(session.email_verification_locked);

    let after = harness.say(EMAIL).await;
    assert_eq!(after.intent, ReplyIntent::EmailVerificationLocked);
    assert!(after.reply.contains("contact HR"));
    assert!(harness.session().await.user_email.is_none());
}

#[tokio::test]
async fn change_email_resets_identity() {
    let harness = Harness::verified().await;
    harness.say("casual leave tomorrow for fever").await;

    let response = harness.say("I want to change my email").await;
    assert_eq!(response.intent, ReplyIntent::RequestEmail);

    let session = harness.session().await;
    assert!(session.user_email.is_none());
    assert!(session.awaiting_email);
    assert!(session.pending_confirmation.is_none());
}

// ============================================================================
// Leave happy path and confirmation
// ============================================================================

#[tokio::test]
async fn casual_leave_is_confirmed_then_created() {
    let harness = Harness::verified().await;

    let proposal = harness.say("casual leave tomorrow for fever").await;
    assert_eq!(proposal.intent, ReplyIntent::ConfirmLeave);
    let Some(PendingRequest::Leave(leave)) = proposal.pending_request.clone() else {
        panic!("expected a pending leave, got {:?}", proposal.pending_request);
    };
    assert_eq!(leave.leave_type, LeaveType::Casual);
    assert_eq!((leave.start_date, leave.end_date), (d(11), d(11)));
    assert!(leave.reason.contains("fever"));
    assert_eq!(leave.employee_name, "Asha Rao");
    assert!(harness.session().await.pending_confirmation.is_some());

    let created = harness.say("yes").await;
    assert_eq!(created.intent, ReplyIntent::LeaveCreated);
    assert!(created.reply.contains("created successfully"));
    let record_id = created.record_id.clone().unwrap();
    assert!(created.reply.contains(&record_id));

    let session = harness.session().await;
    assert!(session.pending_confirmation.is_none());
    assert_eq!(session.last_request.unwrap().record_id, record_id);

    let record = harness.records.get_record(&record_id).await.unwrap().unwrap();
    assert_eq!(record.status, RecordStatus::Pending);
    assert_eq!(record.employee_email.as_deref(), Some(EMAIL));
}

#[tokio::test]
async fn confirmation_button_creates_without_history() {
    let harness = Harness::verified().await;
    harness.say("casual leave tomorrow for fever").await;
    let history_before = harness.session().await.conversation_history.len();

    let created = harness
        .send(ChatRequest::default().with_confirmation(Confirmation::Yes))
        .await;
    assert_eq!(created.intent, ReplyIntent::LeaveCreated);
    assert_eq!(harness.session().await.conversation_history.len(), history_before);
}

#[tokio::test]
async fn yes_with_nothing_pending_creates_nothing() {
    let harness = Harness::verified().await;
    let before = harness.record_count().await;

    let by_text = harness.say("yes").await;
    assert_eq!(by_text.intent, ReplyIntent::NoPendingConfirmation);
    let by_button = harness
        .send(ChatRequest::default().with_confirmation(Confirmation::Yes))
        .await;
    assert_eq!(by_button.intent, ReplyIntent::NoPendingConfirmation);

    assert_eq!(harness.record_count().await, before);
}

#[tokio::test]
async fn second_yes_reports_the_existing_request() {
    let harness = Harness::verified().await;
    harness.say("casual leave tomorrow for fever").await;
    let created = harness.say("yes").await;
    let before = harness.record_count().await;

    let again = harness.say("yes").await;
    assert_eq!(again.intent, ReplyIntent::NoPendingConfirmation);
    assert!(again.reply.contains(created.record_id.as_deref().unwrap()));
    assert_eq!(harness.record_count().await, before);
}

#[tokio::test]
async fn request_starting_with_ok_is_not_an_answer() {
    let harness = Harness::verified().await;

    let proposal = harness.say("ok casual leave tomorrow").await;
    assert_eq!(proposal.intent, ReplyIntent::ConfirmLeave, "{}", proposal.reply);
    harness.say("no").await;

    let sick = harness.say("sure sick leave tomorrow").await;
    assert_eq!(sick.intent, ReplyIntent::ConfirmLeave, "{}", sick.reply);
    let Some(PendingRequest::Leave(leave)) = sick.pending_request else {
        panic!("expected a pending leave");
    };
    assert_eq!(leave.leave_type, LeaveType::Sick);
}

#[tokio::test]
async fn no_cancels_the_pending_request() {
    let harness = Harness::verified().await;
    harness.say("casual leave tomorrow for fever").await;
    let before = harness.record_count().await;

    let cancelled = harness.say("no").await;
    assert_eq!(cancelled.intent, ReplyIntent::ConfirmationNo);
    assert!(harness.session().await.pending_confirmation.is_none());
    assert_eq!(harness.record_count().await, before);
}

#[tokio::test]
async fn unclear_answer_keeps_the_request_pending() {
    let harness = Harness::verified().await;
    harness.say("casual leave tomorrow for fever").await;

    let unclear = harness.say("hmm maybe later perhaps").await;
    assert_eq!(unclear.intent, ReplyIntent::ConfirmationUnclear);
    assert!(unclear.pending_request.is_some());
    assert!(harness.session().await.pending_confirmation.is_some());
}

#[tokio::test]
async fn half_day_is_half_a_day() {
    let harness = Harness::verified().await;
    let proposal = harness.say("half-day leave tomorrow afternoon").await;

    let Some(PendingRequest::Leave(leave)) = proposal.pending_request else {
        panic!("expected a pending leave");
    };
    assert!(leave.is_half_day);
    assert_eq!(leave.duration_days, 0.5);
    assert_eq!(leave.start_date, leave.end_date);
}

// ============================================================================
// Business rules
// ============================================================================

#[tokio::test]
async fn overlapping_leave_is_blocked() {
    let harness = Harness::verified().await;
    let before = harness.record_count().await;

    let response = harness.say("casual leave on December 20 for family function").await;
    assert_eq!(response.intent, ReplyIntent::LeaveOverlap);
    assert!(response.reply.contains("LEAVE_1"));
    assert!(response.reply.contains("2025-12-18"));

    let session = harness.session().await;
    assert!(session.pending_confirmation.is_none());
    assert_eq!(session.leave_conflict.unwrap().existing.id, "LEAVE_1");
    assert_eq!(harness.record_count().await, before);
}

#[tokio::test]
async fn rejected_leave_does_not_block() {
    let harness = Harness::verified().await;
    harness
        .records
        .update_record_status("LEAVE_1", RecordStatus::Rejected)
        .await
        .unwrap();

    let response = harness.say("casual leave on December 20 for family function").await;
    assert_eq!(response.intent, ReplyIntent::ConfirmLeave);
}

#[tokio::test]
async fn holiday_is_blocked() {
    let harness = Harness::verified().await;
    let response = harness.say("casual leave on December 25").await;

    assert_eq!(response.intent, ReplyIntent::LeaveOnHoliday);
    assert!(response.reply.contains("Christmas"));
    assert!(harness.session().await.pending_confirmation.is_none());
}

#[tokio::test]
async fn wfh_on_holiday_is_blocked() {
    let harness = Harness::verified().await;
    let response = harness.say("wfh on December 25 for internet install").await;
    assert_eq!(response.intent, ReplyIntent::WfhOnHoliday);
}

#[tokio::test]
async fn past_date_is_blocked() {
    let harness = Harness::verified().await;
    let response = harness.say("sick leave on December 5").await;

    assert_eq!(response.intent, ReplyIntent::PastDate);
    assert!(harness.session().await.pending_confirmation.is_none());
}

#[tokio::test]
async fn inverted_range_asks_for_new_dates() {
    let harness = Harness::verified().await;
    let response = harness.say("leave from 20th to 15th this month").await;

    assert_eq!(response.intent, ReplyIntent::ValidationError);
    assert!(response.reply.contains("End date cannot be earlier than start date"));
}

#[tokio::test]
async fn impossible_day_is_reported() {
    let harness = Harness::verified().await;
    let response = harness.say("Apply leave on 32th of December.").await;

    assert_eq!(response.intent, ReplyIntent::ValidationError);
    assert!(response.reply.contains("Invalid day"));
    assert!(response.pending_request.is_none());
}

#[tokio::test]
async fn insufficient_balance_is_blocked() {
    let harness = Harness::verified().await;
    let response = harness
        .say("13 days of casual leave starting 2026-02-02")
        .await;

    assert_eq!(response.intent, ReplyIntent::LeaveBalanceInsufficient);
    assert!(response.reply.contains("Requested: 13 days"));
    assert!(response.reply.contains("Available: 12 days"));
}

// ============================================================================
// Edits
// ============================================================================

#[tokio::test]
async fn edit_form_updates_pending_dates() {
    let harness = Harness::verified().await;
    harness.say("casual leave tomorrow for fever").await;

    let edit = EditDetails {
        start_date: Some(d(15)),
        end_date: Some(d(16)),
        ..Default::default()
    };
    let response = harness
        .send(ChatRequest::default().with_edit(IntentOverride::EditLeave, edit))
        .await;

    assert_eq!(response.intent, ReplyIntent::ConfirmLeave);
    assert!(response.reply.contains("UPDATED"));
    let Some(PendingRequest::Leave(leave)) = harness.session().await.pending_confirmation else {
        panic!("expected a pending leave");
    };
    assert_eq!((leave.start_date, leave.end_date), (d(15), d(16)));
    assert_eq!(leave.duration_days, 2.0);
    assert_eq!(leave.leave_type, LeaveType::Casual);
    assert!(leave.reason.contains("fever"));
}

#[tokio::test]
async fn edit_keyword_without_details_prompts() {
    let harness = Harness::verified().await;
    harness.say("casual leave tomorrow for fever").await;

    let response = harness.say("edit").await;
    assert_eq!(response.intent, ReplyIntent::EditRequest);
    assert!(harness.session().await.pending_confirmation.is_some());
}

#[tokio::test]
async fn edit_into_overlap_is_rejected() {
    let harness = Harness::verified().await;
    harness.say("casual leave tomorrow for fever").await;

    let edit = EditDetails {
        start_date: Some(d(19)),
        end_date: Some(d(19)),
        ..Default::default()
    };
    let response = harness
        .send(ChatRequest::default().with_edit(IntentOverride::EditLeave, edit))
        .await;
    assert_eq!(response.intent, ReplyIntent::LeaveOverlap);
}

#[tokio::test]
async fn edit_after_commit_points_at_the_record() {
    let harness = Harness::verified().await;
    harness.say("casual leave tomorrow for fever").await;
    let created = harness.say("yes").await;

    let response = harness.say("I want to change the date").await;
    assert_eq!(response.intent, ReplyIntent::EditAfterCreation);
    assert!(response.reply.contains(created.record_id.as_deref().unwrap()));
}

#[tokio::test]
async fn new_request_mentioning_a_fix_after_commit_is_applied() {
    let harness = Harness::verified().await;
    harness.say("casual leave tomorrow for fever").await;
    harness.say("yes").await;

    let response = harness.say("I need leave on 2025-12-15 to fix my car").await;
    assert_eq!(response.intent, ReplyIntent::ConfirmLeave, "{}", response.reply);
    assert_eq!(response.pending_request.unwrap().start_date(), d(15));
}

// ============================================================================
// Re-checks at commit time
// ============================================================================

fn sick_day(day: u32) -> LeaveRequest {
    LeaveRequest {
        leave_type: LeaveType::Sick,
        start_date: d(day),
        end_date: d(day),
        reason: "Doctor visit".to_string(),
        employee_name: "Asha Rao".to_string(),
        duration_days: 1.0,
        is_half_day: false,
    }
}

#[tokio::test]
async fn overlap_created_before_yes_blocks_the_commit() {
    let harness = Harness::verified().await;
    let proposal = harness.say("casual leave tomorrow for fever").await;
    assert_eq!(proposal.intent, ReplyIntent::ConfirmLeave);

    let conflicting = harness
        .records
        .create_leave_record(None, &sick_day(11))
        .await
        .unwrap();
    let before = harness.record_count().await;

    let response = harness.say("yes").await;
    assert_eq!(response.intent, ReplyIntent::LeaveOverlap);
    assert!(response.reply.contains(&conflicting.id));
    assert_eq!(harness.record_count().await, before);

    let session = harness.session().await;
    assert!(session.pending_confirmation.is_none());
    assert!(session.last_request.is_none());
    assert_eq!(session.leave_conflict.unwrap().existing.id, conflicting.id);
}

#[tokio::test]
async fn holiday_declared_before_yes_blocks_the_commit() {
    let harness = Harness::verified().await;
    harness.say("casual leave tomorrow for fever").await;
    harness.calendar.declare(Holiday {
        date: d(11),
        name: "Founders Day".to_string(),
        kind: None,
        optional: false,
    });
    let before = harness.record_count().await;

    let response = harness.say("yes").await;
    assert_eq!(response.intent, ReplyIntent::LeaveOnHoliday);
    assert!(response.reply.contains("Founders Day"));
    assert_eq!(harness.record_count().await, before);
    assert!(harness.session().await.pending_confirmation.is_none());
}

#[tokio::test]
async fn leave_that_slipped_into_the_past_is_not_created() {
    let config = LeaveDeskConfig {
        session_timeout_minutes: 7 * 24 * 60,
        ..Default::default()
    };
    let harness = Harness::build(Arc::new(EchoAssistant), config, false)
        .verify()
        .await;
    harness.say("casual leave tomorrow for fever").await;
    let before = harness.record_count().await;

    harness.clock.advance_days(2);
    let response = harness
        .send(ChatRequest::default().with_confirmation(Confirmation::Yes))
        .await;
    assert_eq!(response.intent, ReplyIntent::PastDate, "{}", response.reply);
    assert!(response.reply.contains("in the past"));
    assert_eq!(harness.record_count().await, before);
    assert!(harness.session().await.pending_confirmation.is_none());
}

#[tokio::test]
async fn failed_write_clears_the_pending_request() {
    let harness = Harness::build(Arc::new(EchoAssistant), LeaveDeskConfig::default(), true)
        .verify()
        .await;
    let proposal = harness.say("casual leave tomorrow for fever").await;
    assert_eq!(proposal.intent, ReplyIntent::ConfirmLeave);
    let before = harness.record_count().await;

    let response = harness.say("yes").await;
    assert_eq!(response.intent, ReplyIntent::Error);
    assert!(response.reply.contains("Failed to submit leave request"));
    assert!(response.record_id.is_none());
    assert_eq!(harness.record_count().await, before);

    let session = harness.session().await;
    assert!(session.pending_confirmation.is_none());
    assert!(session.last_request.is_none());
}

// ============================================================================
// WFH and informational intents
// ============================================================================

#[tokio::test]
async fn wfh_request_round_trip() {
    let harness = Harness::verified().await;

    let proposal = harness.say("work from home tomorrow for plumber visit").await;
    assert_eq!(proposal.intent, ReplyIntent::ConfirmWfh);

    let created = harness.say("confirm").await;
    assert_eq!(created.intent, ReplyIntent::WfhCreated);
    let record_id = created.record_id.unwrap();
    assert!(record_id.starts_with("WFH_"));

    let record = harness.records.get_record(&record_id).await.unwrap().unwrap();
    assert_eq!(record.start_date, d(11));
    assert_eq!(record.reason, "plumber visit");
}

#[tokio::test]
async fn wfh_without_date_asks_for_one() {
    let harness = Harness::verified().await;
    let response = harness.say("I want to work from home").await;
    assert_eq!(response.intent, ReplyIntent::NeedMoreDetails);
}

#[tokio::test]
async fn informational_intents() {
    let harness = Harness::verified().await;

    let holidays = harness.say("show me the holiday list").await;
    assert_eq!(holidays.intent, ReplyIntent::HolidayList);
    assert!(holidays.reply.contains("Christmas"));

    let policy = harness.say("explain leave policy").await;
    assert_eq!(policy.intent, ReplyIntent::LeavePolicy);

    let balance = harness.say("check leave balance").await;
    assert_eq!(balance.intent, ReplyIntent::LeaveBalance);

    let requests = harness.say("show my requests").await;
    assert_eq!(requests.intent, ReplyIntent::RequestsListed);
    assert!(requests.reply.contains("LEAVE_1"));
}

#[tokio::test]
async fn general_questions_go_to_the_assistant() {
    let harness = Harness::verified().await;
    let response = harness.say("what's the weather like").await;

    assert_eq!(response.intent, ReplyIntent::GeneralQuery);
    assert_eq!(response.reply, "general: what's the weather like");
}

#[tokio::test]
async fn leave_with_a_weekday_is_applied_without_the_assistant() {
    let harness = Harness::verified().await;
    let response = harness.say("leave on friday").await;

    assert_eq!(response.intent, ReplyIntent::ConfirmLeave, "{}", response.reply);
    assert!(!response.reply.starts_with("general:"));
    let Some(PendingRequest::Leave(leave)) = response.pending_request else {
        panic!("expected a pending leave");
    };
    assert_eq!((leave.start_date, leave.end_date), (d(12), d(12)));
}

#[tokio::test]
async fn assistant_failure_still_replies() {
    let harness = Harness::with_assistant(Arc::new(DownAssistant));
    harness.say(EMAIL).await;

    let response = harness.say("what's the weather like").await;
    assert_eq!(response.intent, ReplyIntent::GeneralQuery);
    assert!(!response.reply.is_empty());
}

#[tokio::test]
async fn empty_message_is_invalid() {
    let harness = Harness::new();
    let response = harness.say("   ").await;
    assert_eq!(response.intent, ReplyIntent::InvalidRequest);
    assert!(harness.service.session(SESSION).await.unwrap().is_none());
}

#[tokio::test]
async fn stats_follow_the_conversation() {
    let harness = Harness::verified().await;
    harness.say("casual leave tomorrow for fever").await;

    let stats = harness.service.session_stats(SESSION).await.unwrap().unwrap();
    assert!(stats.has_email);
    assert!(stats.awaiting_confirmation);
    assert_eq!(stats.history_count, 2);

    harness.service.clear_session(SESSION).await.unwrap();
    assert!(harness.service.session_stats(SESSION).await.unwrap().is_none());
}

#[tokio::test]
async fn sessions_follow_the_conversation_clock() {
    let harness = Harness::new();
    harness.say("hi there").await;

    let now = harness.clock.now();
    let session = harness.session().await;
    assert_eq!(session.created_at, now);
    assert_eq!(session.last_activity(), Some(now));
}
