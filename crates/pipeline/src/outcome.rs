//! Per-item results of a fan-out stage.
//!
//! A fan-out stage never fails as a whole because one item failed. Each item
//! ends up either kept or dropped, and the dropped ones keep their reason so
//! they can be logged.

use std::fmt::Display;

use tracing::warn;

/// Why one item was excluded from a stage's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropped {
    /// Identifies the item, usually its url.
    pub key: String,
    pub reason: String,
}

/// Result of processing a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome<T> {
    Kept(T),
    Dropped(Dropped),
}

impl<T> ItemOutcome<T> {
    pub fn dropped(key: impl Into<String>, reason: impl Display) -> Self {
        ItemOutcome::Dropped(Dropped {
            key: key.into(),
            reason: reason.to_string(),
        })
    }

    /// Keep `Ok` values; an `Err` becomes a drop carrying the error text.
    pub fn from_result<E: Display>(key: impl Into<String>, result: Result<T, E>) -> Self {
        match result {
            Ok(item) => ItemOutcome::Kept(item),
            Err(e) => ItemOutcome::dropped(key, e),
        }
    }

    pub fn is_kept(&self) -> bool {
        matches!(self, ItemOutcome::Kept(_))
    }
}

/// Kept items in input order, plus everything that was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<T> {
    pub kept: Vec<T>,
    pub dropped: Vec<Dropped>,
}

impl<T> Partition<T> {
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    /// Emit one warning per dropped item, tagged with the stage.
    pub fn log_dropped(&self, stage: &str) {
        for dropped in &self.dropped {
            warn!(
                stage,
                key = %dropped.key,
                "Dropped item: {}",
                dropped.reason
            );
        }
    }
}

impl<T> Default for Partition<T> {
    fn default() -> Self {
        Self {
            kept: Vec::new(),
            dropped: Vec::new(),
        }
    }
}

impl<T> FromIterator<ItemOutcome<T>> for Partition<T> {
    fn from_iter<I: IntoIterator<Item = ItemOutcome<T>>>(iter: I) -> Self {
        let mut partition = Partition::default();
        for outcome in iter {
            match outcome {
                ItemOutcome::Kept(item) => partition.kept.push(item),
                ItemOutcome::Dropped(dropped) => partition.dropped.push(dropped),
            }
        }
        partition
    }
}
