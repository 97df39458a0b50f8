use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an extraction job. A job is created in `Processing`
/// and moves exactly once to one of the terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid status transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: JobStatus,
    pub to: JobStatus,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// The single authoritative transition check. Only `Processing` may move,
    /// and only to a terminal state; terminal states never change again.
    pub fn transition(self, to: JobStatus) -> Result<JobStatus, InvalidTransition> {
        match (self, to) {
            (JobStatus::Processing, JobStatus::Completed)
            | (JobStatus::Processing, JobStatus::Failed) => Ok(to),
            (from, to) => Err(InvalidTransition { from, to }),
        }
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(JobStatus::Processing),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
