//! Attendance core: identity gate, location readiness, history and the
//! clock-in state machine.

pub mod action;
pub mod history;
pub mod identity;
pub mod location;
pub mod machine;
pub mod record;

