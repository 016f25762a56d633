//! Leave and WFH requests.

pub mod model;

pub use model::{
    DEFAULT_REASON, LastRequest, LeaveRequest, LeaveType, PendingRequest, RequestKind, WfhRequest,
};
