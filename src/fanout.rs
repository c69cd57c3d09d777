// Bounded, order-preserving concurrent map.
// In-flight operations live inside the returned stream, so dropping it cancels them.

use std::future::Future;

use futures::stream::{self, Stream, StreamExt, TryStreamExt};

use crate::error::Result;

/// Default number of concurrent requests.
pub const DEFAULT_MAX_CONNECTIONS: usize = 8;

/// Map `inputs` through `op` with at most `limit` operations in flight.
///
/// Inputs are pulled lazily and results come out in input order, whatever
/// order the operations complete in. A `limit` of zero is treated as one.
pub fn fan_out_stream<I, F, Fut>(limit: usize, inputs: I, op: F) -> impl Stream<Item = Fut::Output>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future,
{
    stream::iter(inputs).map(op).buffered(limit.max(1))
}

/// Run [`fan_out_stream`] to completion, stopping at the first error.
///
/// Operations still in flight when an error surfaces are dropped before this returns.
pub async fn fan_out<I, F, Fut, T>(limit: usize, inputs: I, op: F) -> Result<Vec<T>>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    fan_out_stream(limit, inputs, op).try_collect().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VanityError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct InFlight {
        current: Arc<AtomicUsize>,
    }

    impl InFlight {
        fn enter(current: &Arc<AtomicUsize>, peak: &AtomicUsize) -> Self {
            let now = current.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            Self {
                current: Arc::clone(current),
            }
        }
    }

    impl Drop for InFlight {
        fn drop(&mut self) {
            self.current.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_preserves_input_order_despite_delays() {
        for len in 0..=12u64 {
            let results = fan_out(4, 0..len, |i| async move {
                // later inputs finish first
                tokio::time::sleep(Duration::from_millis((len - i) * 3)).await;
                Ok::<_, VanityError>(i * 10)
            })
            .await
            .unwrap();

            let expected: Vec<u64> = (0..len).map(|i| i * 10).collect();
            assert_eq!(results, expected);
        }
    }

    #[tokio::test]
    async fn test_respects_concurrency_limit() {
        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results = fan_out(3, 0..10, |i| {
            let current = Arc::clone(&current);
            let peak = Arc::clone(&peak);
            async move {
                let _guard = InFlight::enter(&current, &peak);
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok::<_, VanityError>(i)
            }
        })
        .await
        .unwrap();

        assert_eq!(results.len(), 10);
        assert_eq!(peak.load(Ordering::SeqCst), 3);
        assert_eq!(current.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_error_tears_down_in_flight_work() {
        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let result = fan_out(4, 0..20u64, |i| {
            let current = Arc::clone(&current);
            let peak = Arc::clone(&peak);
            async move {
                let _guard = InFlight::enter(&current, &peak);
                if i == 2 {
                    return Err(VanityError::Api {
                        status: 500,
                        message: "boom".to_string(),
                    });
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(i)
            }
        })
        .await;

        assert!(matches!(result, Err(VanityError::Api { status: 500, .. })));
        assert_eq!(current.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stream_is_lazy() {
        let started = Arc::new(AtomicUsize::new(0));
        let mut results = Box::pin(fan_out_stream(2, 0..100, |i| {
            let started = Arc::clone(&started);
            async move {
                started.fetch_add(1, Ordering::SeqCst);
                i
            }
        }));

        assert_eq!(results.next().await, Some(0));
        assert!(started.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_zero_limit_still_runs() {
        let results = fan_out(0, ["a", "b"], |s| async move { Ok::<_, VanityError>(s.len()) })
            .await
            .unwrap();
        assert_eq!(results, vec![1, 1]);
    }
}
