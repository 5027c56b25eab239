//! External system adapters

pub mod payroll_sink;
pub mod time_source;

pub use payroll_sink::SimulatedPayrollSink;
pub use time_source::HttpTimeSource;
