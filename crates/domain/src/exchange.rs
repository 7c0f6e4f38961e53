use crate::query::ClientQuery;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Pending,
    Answered,
    TimedOut,
    Failed,
}

impl ExchangeState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExchangeState::Pending)
    }
}

impl fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeState::Pending => write!(f, "pending"),
            ExchangeState::Answered => write!(f, "answered"),
            ExchangeState::TimedOut => write!(f, "timed_out"),
            ExchangeState::Failed => write!(f, "failed"),
        }
    }
}

/// One in-flight unit of work: a query paired with its eventual outcome.
///
/// An exchange reaches exactly one terminal state. The first transition
/// wins; later attempts are ignored and reported via the return value.
#[derive(Debug)]
pub struct Exchange {
    query: ClientQuery,
    upstream_id: Option<u16>,
    state: ExchangeState,
    started: Instant,
    deadline: Instant,
}

impl Exchange {
    pub fn new(query: ClientQuery, timeout: Duration) -> Self {
        let started = Instant::now();
        Self {
            query,
            upstream_id: None,
            state: ExchangeState::Pending,
            started,
            deadline: started + timeout,
        }
    }

    pub fn query(&self) -> &ClientQuery {
        &self.query
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// ID used on the outbound leg toward the upstream. May differ from
    /// the client's transaction ID.
    pub fn upstream_id(&self) -> Option<u16> {
        self.upstream_id
    }

    pub fn set_upstream_id(&mut self, id: u16) {
        self.upstream_id = Some(id);
    }

    pub fn answer(&mut self) -> bool {
        self.finish(ExchangeState::Answered)
    }

    pub fn time_out(&mut self) -> bool {
        self.finish(ExchangeState::TimedOut)
    }

    pub fn fail(&mut self) -> bool {
        self.finish(ExchangeState::Failed)
    }

    fn finish(&mut self, next: ExchangeState) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = next;
        true
    }
}
