//! Offline assistant answering from a fixed keyword table.

use async_trait::async_trait;
use leavedesk_core::assistant::GeneralAssistant;
use leavedesk_core::error::Result;
use leavedesk_core::session::HistoryEntry;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topic {
    Greeting,
    Thanks,
    Reimbursement,
    Payslip,
    Help,
}

/// Checked in order; the first topic with a matching phrase wins.
const TOPICS: &[(&[&str], Topic)] = &[
    (&["reimbursement", "reimburse", "claim", "expense"], Topic::Reimbursement),
    (&["payslip", "pay slip", "salary", "payroll"], Topic::Payslip),
    (&["help", "what can you do", "commands", "options"], Topic::Help),
    (&["thank", "thanks", "cheers"], Topic::Thanks),
    (&["hello", "hi", "hey", "good morning", "good afternoon", "good evening"], Topic::Greeting),
];

/// Answers common HR questions without a language model.
#[derive(Debug, Clone)]
pub struct CannedAssistant {
    company_name: String,
}

impl CannedAssistant {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
        }
    }

    fn topic_of(message: &str) -> Option<Topic> {
        let lowered = message.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect();

        TOPICS
            .iter()
            .find(|(phrases, _)| {
                phrases.iter().any(|phrase| {
                    if phrase.contains(' ') {
                        lowered.contains(phrase)
                    } else {
                        words.iter().any(|word| word.starts_with(phrase))
                    }
                })
            })
            .map(|(_, topic)| *topic)
    }

    fn reply(&self, topic: Option<Topic>) -> String {
        let company = &self.company_name;
        match topic {
            Some(Topic::Greeting) => format!(
                "Hello! I'm the {company} HR Assistant. I can help you apply for leave or WFH, \
                 check your leave balance, or show the holiday list."
            ),
            Some(Topic::Thanks) => "You're welcome! Let me know if there's anything else I can help with.".to_string(),
            Some(Topic::Reimbursement) => "💰 **Reimbursement Process**\n\n\
                 • Submit your claim with original bills within 30 days of the expense\n\
                 • Attach receipts for travel, internet or medical expenses\n\
                 • Your manager approves the claim, then Finance processes it with the next payroll\n\n\
                 For specific limits, please contact HR or Finance."
                .to_string(),
            Some(Topic::Payslip) => format!(
                "Payslips are published on the {company} HR portal at the end of each month. \
                 For salary questions, please contact the payroll team."
            ),
            Some(Topic::Help) | None => "Here's what I can help you with:\n\n\
                 • \"apply for leave\" - e.g. \"casual leave tomorrow for fever\"\n\
                 • \"apply for wfh\" - e.g. \"WFH on Friday for plumber visit\"\n\
                 • \"check holiday list\" - company holidays this month\n\
                 • \"leave policy\" / \"wfh policy\" - policy summaries\n\
                 • \"leave balance\" - your remaining leave\n\
                 • \"show my requests\" - your leave and WFH requests"
                .to_string(),
        }
    }
}

impl Default for CannedAssistant {
    fn default() -> Self {
        Self::new("Winfomi")
    }
}

#[async_trait]
impl GeneralAssistant for CannedAssistant {
    async fn answer(&self, message: &str, _history: &[HistoryEntry]) -> Result<String> {
        let topic = Self::topic_of(message);
        debug!(?topic, "canned answer");
        Ok(self.reply(topic))
    }
}
