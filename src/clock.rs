use chrono::{DateTime, Local};

/// Source of "now" for the attendance service. Local time decides the
/// calendar day and year a session belongs to.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[cfg(test)]
pub use fixed::FixedClock;
