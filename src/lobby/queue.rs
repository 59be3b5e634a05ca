//! FIFO queue of spectators waiting for a seat

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Connection waiting in the spectator queue
#[derive(Debug, Clone)]
pub struct QueuedSpectator {
    pub conn_id: Uuid,
    pub queued_at: Instant,
}

impl QueuedSpectator {
    pub fn new(conn_id: Uuid) -> Self {
        Self {
            conn_id,
            queued_at: Instant::now(),
        }
    }

    /// How long this spectator has been waiting
    pub fn wait_time(&self) -> Duration {
        self.queued_at.elapsed()
    }
}

/// The spectator queue
#[derive(Debug, Default)]
pub struct SpectatorQueue {
    queue: VecDeque<QueuedSpectator>,
}

impl SpectatorQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to the back of the queue
    pub fn enqueue(&mut self, conn_id: Uuid) {
        // Remove if already queued (rejoin)
        self.queue.retain(|s| s.conn_id != conn_id);
        self.queue.push_back(QueuedSpectator::new(conn_id));
    }

    /// Remove a connection from anywhere in the queue
    pub fn dequeue(&mut self, conn_id: Uuid) -> Option<QueuedSpectator> {
        let pos = self.queue.iter().position(|s| s.conn_id == conn_id)?;
        self.queue.remove(pos)
    }

    /// Take the longest-waiting spectator
    pub fn pop_front(&mut self) -> Option<QueuedSpectator> {
        self.queue.pop_front()
    }

    /// Check if a connection is queued
    pub fn contains(&self, conn_id: &Uuid) -> bool {
        self.queue.iter().any(|s| &s.conn_id == conn_id)
    }

    /// Get queue length
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
