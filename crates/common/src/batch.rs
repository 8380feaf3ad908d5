//! Fan-out/fan-in over named fetches
//!
//! Every fetch in a batch is polled concurrently and the batch resolves
//! once all of them have settled. One failure never aborts the others.

use futures::future::{join_all, BoxFuture};

use crate::errors::Result;

/// Outcome of one named fetch
#[derive(Debug)]
pub struct Settled<K, T> {
    pub key: K,
    pub outcome: Result<T>,
}

/// Run every fetch concurrently and wait until all have settled.
///
/// Results are returned in the order the fetches were given, regardless
/// of completion order.
pub async fn settle_all<'a, K, T>(fetches: Vec<(K, BoxFuture<'a, Result<T>>)>) -> Vec<Settled<K, T>> {
    let (keys, futures): (Vec<K>, Vec<_>) = fetches.into_iter().unzip();
    let outcomes = join_all(futures).await;

    keys.into_iter()
        .zip(outcomes)
        .map(|(key, outcome)| Settled { key, outcome })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use futures::FutureExt;
    use std::time::Duration;

    #[tokio::test]
    async fn test_failure_does_not_abort_batch() {
        let fetches: Vec<(&str, BoxFuture<'_, Result<u32>>)> = vec![
            ("a", async { Ok(1) }.boxed()),
            (
                "b",
                async { Err(AppError::transport("GET /b", None, "boom")) }.boxed(),
            ),
            (
                "c",
                async {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Ok(3)
                }
                .boxed(),
            ),
        ];

        let settled = settle_all(fetches).await;

        assert_eq!(settled.len(), 3);
        assert_eq!(settled[0].key, "a");
        assert_eq!(settled[0].outcome.as_ref().ok(), Some(&1));
        assert!(settled[1].outcome.is_err());
        assert_eq!(settled[2].outcome.as_ref().ok(), Some(&3));
    }

    #[tokio::test]
    async fn test_keeps_submission_order() {
        let fetches: Vec<(usize, BoxFuture<'_, Result<usize>>)> = (0..4)
            .map(|i| {
                let fut = async move {
                    tokio::time::sleep(Duration::from_millis(40 - i as u64 * 10)).await;
                    Ok(i)
                }
                .boxed();
                (i, fut)
            })
            .collect();

        let settled = settle_all(fetches).await;
        let keys: Vec<usize> = settled.iter().map(|s| s.key).collect();
        assert_eq!(keys, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let settled = settle_all::<&str, ()>(Vec::new()).await;
        assert!(settled.is_empty());
    }
}
