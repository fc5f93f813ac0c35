pub mod amount;
pub mod company;
pub mod employee;
pub mod payroll;
pub mod payroll_status;
pub mod payslip;
pub mod role;
pub mod team;
pub mod validation;
