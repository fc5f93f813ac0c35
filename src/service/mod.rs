//! One service per backend resource. Each method is a single round trip:
//! `Ok(Some(_))` on the expected status, `Ok(None)` on any other 2xx status,
//! `Err` when the transport rejects the call.

pub mod employee;
pub mod payroll;
pub mod team;

pub use employee::EmployeeService;
pub use payroll::PayrollService;
pub use team::TeamService;
