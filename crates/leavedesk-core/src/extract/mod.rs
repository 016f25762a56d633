//! Entity extraction from free-form chat messages.

mod entities;
mod keywords;

pub use entities::{
    Confirmation, LeaveDetails, WfhDetails, extract_confirmation, extract_email,
    extract_leave_details, extract_leave_type, extract_reason, extract_wfh_details,
    is_company_email, is_confirmation, is_edit_request, is_rejection, refers_back_to_request,
};
