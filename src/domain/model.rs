use crate::utils::error::Result;
use crate::utils::validation::validate_url;
use std::fmt;
use std::time::Duration;
use url::Url;

/// A downstream receiver the relay forwards every payload to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    url: Url,
}

impl Destination {
    pub fn parse(url: &str) -> Result<Self> {
        let url = validate_url("destinations", url)?;
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Terminal state of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered { status_code: u16 },
    Rejected { status_code: u16 },
    TimedOut,
    Unreachable { reason: String },
    Aborted { reason: String },
}

impl DeliveryStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivered { status_code } => write!(f, "delivered ({})", status_code),
            Self::Rejected { status_code } => write!(f, "rejected ({})", status_code),
            Self::TimedOut => f.write_str("timed out"),
            Self::Unreachable { reason } => write!(f, "unreachable: {}", reason),
            Self::Aborted { reason } => write!(f, "aborted: {}", reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    pub destination: Destination,
    pub status: DeliveryStatus,
    pub elapsed: Duration,
}

impl DeliveryOutcome {
    pub fn new(destination: Destination, status: DeliveryStatus, elapsed: Duration) -> Self {
        Self {
            destination,
            status,
            elapsed,
        }
    }

    pub fn aborted(destination: Destination, reason: impl Into<String>) -> Self {
        Self::new(
            destination,
            DeliveryStatus::Aborted {
                reason: reason.into(),
            },
            Duration::ZERO,
        )
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Outcomes of one inbound request, in destination order.
#[derive(Debug, Clone, Default)]
pub struct FanOutReport {
    pub outcomes: Vec<DeliveryOutcome>,
}

impl FanOutReport {
    pub fn new(outcomes: Vec<DeliveryOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn delivered(&self) -> usize {
        self.successes().count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.delivered()
    }

    pub fn successes(&self) -> impl Iterator<Item = &DeliveryOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeliveryOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}
