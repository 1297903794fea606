use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Runs `f` immediately and then once per `period` until it breaks or `cancel` fires.
///
/// The state returned through `ControlFlow::Continue` is handed to the next
/// run. Each run races the token, so a tick stuck on I/O or on a full channel
/// is dropped as soon as the token is cancelled. Returns `None` on
/// cancellation.
pub async fn new<S, T, F, Fut>(
    period: Duration,
    cancel: &CancellationToken,
    init: S,
    mut f: F,
) -> Option<T>
where
    F: FnMut(S) -> Fut,
    Fut: Future<Output = ControlFlow<T, S>>,
{
    let mut interval = tokio::time::interval(period);
    // A slow tick pushes the schedule back instead of firing a burst afterwards.
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut state = init;
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return None,
            _ = interval.tick() => {}
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return None,
            flow = f(state) => match flow {
                ControlFlow::Continue(next) => state = next,
                ControlFlow::Break(ret) => return Some(ret),
            },
        }
    }
}
