use std::future::Future;

#[derive(Debug, Clone, PartialEq)]
pub enum RetryOutcome<C> {
    Accepted { candidate: C, attempts: usize },
    Exhausted { attempts: usize },
}

impl<C> RetryOutcome<C> {
    pub fn attempts(&self) -> usize {
        match self {
            RetryOutcome::Accepted { attempts, .. } | RetryOutcome::Exhausted { attempts } => {
                *attempts
            }
        }
    }
}

/// Calls `attempt` with the attempt index until `accept` holds for its candidate,
/// at most `max_attempts` times. Attempts run one after the other and the first
/// error is returned as is.
pub async fn retry_until_accepted<C, E, F, Fut, A>(
    max_attempts: usize,
    mut attempt: F,
    mut accept: A,
) -> Result<RetryOutcome<C>, E>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<C, E>>,
    A: FnMut(&C) -> bool,
{
    for attempt_index in 0..max_attempts {
        let candidate = attempt(attempt_index).await?;

        if accept(&candidate) {
            return Ok(RetryOutcome::Accepted {
                candidate,
                attempts: attempt_index + 1,
            });
        }
    }

    Ok(RetryOutcome::Exhausted {
        attempts: max_attempts,
    })
}
