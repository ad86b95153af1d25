// SPDX-FileCopyrightText: 2026 Pwguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timed scrubbing of revealed credentials.
//!
//! Every reveal is paired with a detached task that deletes the message
//! after the reveal delay. Pending deletions for a user run early when that
//! user sends a new command, and all of them run early on shutdown.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use pwguard_core::{ChannelAdapter, MessageId, UserId};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

/// Schedules deletion of revealed messages.
pub struct RevealScheduler {
    channel: Arc<dyn ChannelAdapter>,
    ttl: Duration,
    root: CancellationToken,
    per_user: HashMap<UserId, CancellationToken>,
    tracker: TaskTracker,
}

impl RevealScheduler {
    pub fn new(channel: Arc<dyn ChannelAdapter>, ttl: Duration) -> Self {
        Self {
            channel,
            ttl,
            root: CancellationToken::new(),
            per_user: HashMap::new(),
            tracker: TaskTracker::new(),
        }
    }

    /// Deletes `message_id` after the reveal delay, or sooner if cancelled.
    pub fn schedule(&mut self, user_id: UserId, message_id: MessageId) {
        let token = self
            .per_user
            .entry(user_id)
            .or_insert_with(|| self.root.child_token())
            .clone();
        let channel = Arc::clone(&self.channel);
        let ttl = self.ttl;

        self.tracker.spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(ttl) => {}
                _ = token.cancelled() => {
                    debug!(user_id = %user_id, "reveal scrubbed early");
                }
            }
            if let Err(e) = channel.delete(user_id, message_id).await {
                warn!(user_id = %user_id, error = %e, "failed to scrub revealed message");
            }
        });
    }

    /// Scrubs all of the user's pending reveals now.
    pub fn cancel_user(&mut self, user_id: UserId) {
        if let Some(token) = self.per_user.remove(&user_id) {
            token.cancel();
        }
    }

    /// Number of scrub tasks still running.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Scrubs every pending reveal and waits for the deletions to finish.
    pub async fn shutdown(&mut self) {
        self.root.cancel();
        self.per_user.clear();
        self.tracker.close();
        self.tracker.wait().await;
    }
}
