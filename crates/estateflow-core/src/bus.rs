// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Automation log bus.
//!
//! An explicit publish-subscribe object owned by whichever component
//! composes the UI -- not module-level shared state. Subscribers hold a
//! [`LogSubscription`]; dropping it unsubscribes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::sync::broadcast;

/// Which subsystem emitted a log event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LogModule {
    Ingestor,
    AiAgent,
    Airtop,
    Network,
    System,
}

/// Severity of a log event, as the dashboard renders it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One automation log event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationLog {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub module: LogModule,
    pub level: LogLevel,
    pub message: String,
}

/// Broadcast bus for automation log events.
///
/// Cloning the bus shares the underlying channel; a bus with no live
/// subscribers drops published events silently.
#[derive(Debug, Clone)]
pub struct LogBus {
    tx: broadcast::Sender<AutomationLog>,
}

impl LogBus {
    /// Creates a bus retaining up to `capacity` undelivered events per
    /// subscriber. Slow subscribers skip over lost events rather than
    /// blocking publishers.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publishes an event to all current subscribers.
    pub fn publish(&self, module: LogModule, level: LogLevel, message: impl Into<String>) {
        let log = AutomationLog {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            module,
            level,
            message: message.into(),
        };
        // A send error just means nobody is listening right now.
        let _ = self.tx.send(log);
    }

    /// Registers a new subscriber. Only events published after this call
    /// are delivered.
    pub fn subscribe(&self) -> LogSubscription {
        LogSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for LogBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// A handle to a log subscription. Dropping it unsubscribes.
pub struct LogSubscription {
    rx: broadcast::Receiver<AutomationLog>,
}

impl LogSubscription {
    /// Waits for the next event. Returns `None` once the bus is gone.
    /// Events lost to backpressure are skipped, not surfaced as errors.
    pub async fn next(&mut self) -> Option<AutomationLog> {
        loop {
            match self.rx.recv().await {
                Ok(log) => return Some(log),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "log subscriber lagged, skipping events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_events() {
        let bus = LogBus::new(16);
        let mut sub = bus.subscribe();

        bus.publish(LogModule::Ingestor, LogLevel::Info, "polling updates");

        let log = sub.next().await.unwrap();
        assert_eq!(log.module, LogModule::Ingestor);
        assert_eq!(log.level, LogLevel::Info);
        assert_eq!(log.message, "polling updates");
        assert!(!log.id.is_empty());
    }

    #[tokio::test]
    async fn dropping_subscription_unsubscribes() {
        let bus = LogBus::new(16);
        let sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);

        // Publishing with no subscribers must not panic.
        bus.publish(LogModule::System, LogLevel::Warning, "nobody listening");
    }

    #[tokio::test]
    async fn multiple_subscribers_see_the_same_event() {
        let bus = LogBus::new(16);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.publish(LogModule::Airtop, LogLevel::Success, "published listing");

        assert_eq!(a.next().await.unwrap().message, "published listing");
        assert_eq!(b.next().await.unwrap().message, "published listing");
    }

    #[tokio::test]
    async fn late_subscriber_misses_earlier_events() {
        let bus = LogBus::new(16);
        bus.publish(LogModule::System, LogLevel::Info, "before subscribe");

        let mut sub = bus.subscribe();
        bus.publish(LogModule::System, LogLevel::Info, "after subscribe");

        assert_eq!(sub.next().await.unwrap().message, "after subscribe");
    }
}
