use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::time::timeout;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use leavedesk_application::conversation::replies;
use leavedesk_application::{ChatService, ConversationMachine, SessionCache};
use leavedesk_core::assistant::GeneralAssistant;
use leavedesk_core::chat::{ChatRequest, ChatResponse, ReplyIntent};
use leavedesk_core::clock::{Clock, SystemClock};
use leavedesk_core::config::LeaveDeskConfig;
use leavedesk_core::extract::Confirmation;
use leavedesk_core::holiday::HolidayRepository;
use leavedesk_core::record::{RecordStatus, RecordStore, RequestRecord};
use leavedesk_infrastructure::{
    ConfigService, InMemoryHolidayRepository, InMemoryRecordStore, JsonHolidayRepository,
    LeaveDeskPaths,
};
use leavedesk_interaction::{CannedAssistant, OpenAiAssistant};

mod commands;

use commands::{COMMAND_NAMES, HELP, SlashCommand};

const TURN_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(name = "leavedesk")]
#[command(about = "LeaveDesk - apply for leave and work from home by chatting", long_about = None)]
struct Args {
    /// Config file (defaults to $LEAVEDESK_CONFIG or ~/.config/leavedesk/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Resume or name a session
    #[arg(long)]
    session: Option<String>,

    /// Verify with this email before the first prompt
    #[arg(long)]
    email: Option<String>,

    /// Never call the language model
    #[arg(long)]
    offline: bool,

    /// Only accept employees listed in the seed data
    #[arg(long)]
    strict_directory: bool,
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMAND_NAMES.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Everything a REPL turn needs.
struct Repl {
    service: ChatService,
    records: Arc<InMemoryRecordStore>,
    session_id: String,
}

impl Repl {
    async fn chat(&self, request: ChatRequest) {
        let request = request.with_session(&self.session_id);
        match timeout(TURN_TIMEOUT, self.service.handle_message(request)).await {
            Ok(response) => print_response(&response),
            Err(_) => eprintln!("{}", "Error: Request timed out.".red()),
        }
    }

    /// Runs one slash command. Returns false to leave the loop.
    async fn command(&self, command: SlashCommand) -> bool {
        match command {
            SlashCommand::Help => println!("{}", HELP.bright_black()),
            SlashCommand::Yes => {
                self.chat(ChatRequest::default().with_confirmation(Confirmation::Yes))
                    .await
            }
            SlashCommand::No => {
                self.chat(ChatRequest::default().with_confirmation(Confirmation::No))
                    .await
            }
            SlashCommand::Stats => match self.service.session_stats(&self.session_id).await {
                Ok(Some(stats)) => {
                    println!("{}", format!("Session {}", self.session_id).bright_magenta());
                    println!("  has email:             {}", stats.has_email);
                    println!("  history entries:       {}", stats.history_count);
                    println!("  has last request:      {}", stats.has_last_request);
                    println!("  has conflict:          {}", stats.has_conflict);
                    println!("  awaiting confirmation: {}", stats.awaiting_confirmation);
                }
                Ok(None) => println!("{}", "No session yet. Say hello!".bright_black()),
                Err(err) => eprintln!("{}", format!("Error: {err}").red()),
            },
            SlashCommand::Session => match self.service.session(&self.session_id).await {
                Ok(Some(session)) => println!("{session:#?}"),
                Ok(None) => println!("{}", "No session yet. Say hello!".bright_black()),
                Err(err) => eprintln!("{}", format!("Error: {err}").red()),
            },
            SlashCommand::Clear => match self.service.clear_session(&self.session_id).await {
                Ok(()) => println!("{}", "Session cleared.".bright_green()),
                Err(err) => eprintln!("{}", format!("Error: {err}").red()),
            },
            SlashCommand::Records => {
                let records = self.records.all_records().await;
                if records.is_empty() {
                    println!("{}", "No records.".bright_black());
                }
                for record in &records {
                    print_record(record);
                }
            }
            SlashCommand::Record(id) => match self.records.get_record(&id).await {
                Ok(Some(record)) => print_record(&record),
                Ok(None) => println!("{}", format!("Record {id} not found.").yellow()),
                Err(err) => eprintln!("{}", format!("Error: {err}").red()),
            },
            SlashCommand::Approve(id) => self.set_status(&id, RecordStatus::Approved).await,
            SlashCommand::Reject(id) => self.set_status(&id, RecordStatus::Rejected).await,
            SlashCommand::Quit => {
                println!("{}", "Goodbye!".bright_green());
                return false;
            }
            SlashCommand::Usage(usage) => println!("{}", format!("Usage: {usage}").yellow()),
            SlashCommand::Unknown(line) => {
                println!("{}", format!("Unknown command: {line}").bright_black())
            }
        }
        true
    }

    async fn set_status(&self, id: &str, status: RecordStatus) {
        match self.records.update_record_status(id, status).await {
            Ok(record) => {
                println!("{}", format!("{} is now {}.", record.id, record.status).bright_green())
            }
            Err(err) if err.is_not_found() => {
                println!("{}", format!("Record {id} not found.").yellow())
            }
            Err(err) => eprintln!("{}", format!("Error: {err}").red()),
        }
    }
}

fn print_response(response: &ChatResponse) {
    let paint = |line: &str| match response.intent {
        ReplyIntent::Error | ReplyIntent::EmailVerificationLocked => line.red(),
        ReplyIntent::LeaveCreated | ReplyIntent::WfhCreated => line.bright_green(),
        _ => line.bright_blue(),
    };
    for line in response.reply.lines() {
        println!("{}", paint(line));
    }
    if response.show_buttons {
        println!("{}", "(/yes to confirm, /no to cancel, or type your changes)".bright_black());
    }
    println!("{}", format!("[{}]", response.intent).bright_black());
}

fn print_record(record: &RequestRecord) {
    let label = record
        .leave_type
        .map(|leave_type| leave_type.to_string())
        .unwrap_or_else(|| "WFH".to_string());
    println!(
        "{} {} {} {} {} to {} ({}) - {}",
        record.status.marker(),
        record.id.bright_magenta(),
        record.employee_name,
        label,
        record.start_date,
        record.end_date,
        record.status,
        record.reason.bright_black(),
    );
}

async fn build_records(
    config: &LeaveDeskConfig,
    clock: Arc<dyn Clock>,
    strict: bool,
) -> Arc<InMemoryRecordStore> {
    let seed_file = config
        .seed_file
        .clone()
        .or_else(|| LeaveDeskPaths::seed_file().ok().filter(|path| path.exists()));

    let store = match seed_file {
        Some(path) => match InMemoryRecordStore::load_seed(&path, clock.clone()).await {
            Ok(store) => store,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "seed file unusable, using demo data");
                InMemoryRecordStore::demo(clock)
            }
        },
        None => InMemoryRecordStore::demo(clock),
    };

    let store = if strict {
        store
    } else {
        store.with_open_directory(&config.email_domain)
    };
    Arc::new(store)
}

fn build_holidays(config: &LeaveDeskConfig) -> Arc<dyn HolidayRepository> {
    let file = config
        .holidays_file
        .clone()
        .or_else(|| LeaveDeskPaths::holidays_file().ok().filter(|path| path.exists()));

    if let Some(path) = file {
        info!(path = %path.display(), "using holiday calendar file");
        return Arc::new(JsonHolidayRepository::new(path));
    }
    match InMemoryHolidayRepository::bundled() {
        Ok(repository) => Arc::new(repository),
        Err(err) => {
            warn!(error = %err, "bundled holiday calendar unreadable");
            Arc::new(InMemoryHolidayRepository::default())
        }
    }
}

fn build_assistant(config: &LeaveDeskConfig, offline: bool) -> Arc<dyn GeneralAssistant> {
    let canned = || Arc::new(CannedAssistant::new(&config.company_name)) as Arc<dyn GeneralAssistant>;
    if offline {
        return canned();
    }

    match OpenAiAssistant::try_from_config(&config.assistant) {
        Ok(assistant) => {
            let policy = format!(
                "{}\n\n{}",
                replies::leave_policy(&config.company_name),
                replies::wfh_policy(&config.company_name)
            );
            Arc::new(
                assistant
                    .with_company(&config.company_name)
                    .with_policy_context(policy),
            )
        }
        Err(err) => {
            info!(error = %err, "language model not configured, answering offline");
            canned()
        }
    }
}

/// The main entry point for the LeaveDesk readline REPL.
///
/// Loads the configuration, wires the record store, holiday calendar and
/// general assistant into a [`ChatService`], then reads chat lines and
/// slash commands until `/quit` or EOF.
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // ===== Backend Initialization =====
    let config_service = match &args.config {
        Some(path) => ConfigService::new().with_path(path),
        None => ConfigService::new(),
    };
    let config = config_service.get_config();

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let records = build_records(&config, clock.clone(), args.strict_directory).await;
    let machine = ConversationMachine::new(
        records.clone(),
        build_holidays(&config),
        build_assistant(&config, args.offline),
        clock,
        config.clone(),
    );
    let sessions = Arc::new(SessionCache::new(config.session_limits()));

    let repl = Repl {
        service: ChatService::new(sessions, machine),
        records,
        session_id: args.session.unwrap_or_else(ChatService::new_session_id),
    };

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    let title = format!("=== {} HR Assistant ===", config.company_name);
    println!("{}", title.bright_magenta().bold());
    println!(
        "{}",
        "Chat to apply for leave or WFH. Type '/help' for commands or '/quit' to exit."
            .bright_black()
    );
    println!();

    if let Some(email) = args.email {
        repl.chat(ChatRequest::text("hello").with_email(email)).await;
    }

    // ===== Main REPL Loop =====
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                if let Some(command) = SlashCommand::parse(trimmed) {
                    if !repl.command(command).await {
                        break;
                    }
                    continue;
                }

                println!("{}", format!("> {trimmed}").green());
                repl.chat(ChatRequest::text(trimmed)).await;
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}
