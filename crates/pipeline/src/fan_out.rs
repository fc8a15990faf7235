//! Bounded-concurrency fan-out that keeps input order.

use std::future::Future;

use futures::stream::{self, StreamExt};

use crate::outcome::{ItemOutcome, Partition};

/// Run `f` over every item with at most `concurrency` calls in flight.
///
/// Results come back in input order, not completion order. A concurrency of
/// 0 is treated as 1.
pub async fn fan_out<I, T, F, Fut>(items: I, concurrency: usize, f: F) -> Vec<T>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = T>,
{
    stream::iter(items)
        .map(f)
        .buffered(concurrency.max(1))
        .collect()
        .await
}

/// [`fan_out`] for calls that may drop their item.
pub async fn fan_out_partitioned<I, T, F, Fut>(items: I, concurrency: usize, f: F) -> Partition<T>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = ItemOutcome<T>>,
{
    fan_out(items, concurrency, f).await.into_iter().collect()
}
