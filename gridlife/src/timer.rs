use std::future::pending;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// Proof that a timer expiration belongs to a particular arming.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct StepToken {
    epoch: u64,
}

/// Cancellable deadline for the next scheduled step.
///
/// Every arm or cancel bumps an epoch counter. An expiration carries the
/// epoch it was armed under and is only accepted while that epoch is still
/// current, so a sleep that was already in flight when the timer got
/// cancelled or re-armed can never trigger a step.
pub(crate) struct StepTimer {
    deadline: Option<Instant>,
    epoch: u64,
}

impl StepTimer {
    pub(crate) fn new() -> Self {
        Self {
            deadline: None,
            epoch: 0,
        }
    }

    /// Schedules the next expiration `delay` from now, superseding any
    /// earlier arming.
    pub(crate) fn arm(&mut self, delay: Duration) -> StepToken {
        self.epoch += 1;
        self.deadline = Some(Instant::now() + delay);
        StepToken { epoch: self.epoch }
    }

    /// Forgets the pending deadline and invalidates outstanding tokens.
    pub(crate) fn cancel(&mut self) {
        self.epoch += 1;
        self.deadline = None;
    }

    /// Whether an expiration token still corresponds to the live arming.
    pub(crate) fn accepts(&self, token: StepToken) -> bool {
        self.deadline.is_some() && token.epoch == self.epoch
    }

    /// Resolves once the armed deadline passes, yielding the token of the
    /// arming it was started under. Pends forever while unarmed.
    pub(crate) async fn expired(&self) -> StepToken {
        match self.deadline {
            Some(deadline) => {
                let token = StepToken { epoch: self.epoch };
                sleep_until(deadline).await;
                token
            }
            None => pending().await,
        }
    }
}
