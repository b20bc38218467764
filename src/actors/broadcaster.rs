use actix::dev::SendError;
use actix::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

use crate::domain::order::{BroadcastError, OrderEvent, OrderNotifier};
use crate::metrics::Metrics;

// ============================================================================
// Notification Broadcaster - Live fan-out of order events
// ============================================================================
//
// Owns the registry of connected subscribers. Each subscriber gets its own
// bounded queue; publishing never waits on a subscriber:
// - queue full   -> event dropped for that subscriber only
// - queue closed -> subscriber removed
//
// The actor handles one message at a time, so a publish always walks a
// consistent view of the registry even while clients come and go. Nothing is
// buffered for subscribers that connect later.
//
// ============================================================================

pub type Notification = Arc<OrderEvent>;

pub struct NotificationBroadcaster {
    subscribers: HashMap<Uuid, mpsc::Sender<Notification>>,
    subscriber_buffer: usize,
    mailbox_capacity: usize,
    metrics: Arc<Metrics>,
}

impl NotificationBroadcaster {
    pub fn new(subscriber_buffer: usize, mailbox_capacity: usize, metrics: Arc<Metrics>) -> Self {
        Self {
            subscribers: HashMap::new(),
            subscriber_buffer: subscriber_buffer.max(1),
            mailbox_capacity: mailbox_capacity.max(1),
            metrics,
        }
    }

    /// Start the actor with its mailbox bounded from the first message on.
    pub fn spawn(self) -> Addr<Self> {
        let mut ctx = Context::new();
        ctx.set_mailbox_capacity(self.mailbox_capacity);
        ctx.run(self)
    }

    fn remove_subscriber(&mut self, id: Uuid) {
        if self.subscribers.remove(&id).is_some() {
            self.metrics.set_subscribers(self.subscribers.len());
            tracing::info!(subscriber_id = %id, remaining = self.subscribers.len(), "Subscriber disconnected");
        }
    }
}

impl Actor for NotificationBroadcaster {
    type Context = Context<Self>;

    fn started(&mut self, _: &mut Self::Context) {
        tracing::info!(
            subscriber_buffer = self.subscriber_buffer,
            mailbox_capacity = self.mailbox_capacity,
            "NotificationBroadcaster started"
        );
    }

    fn stopped(&mut self, _: &mut Self::Context) {
        self.subscribers.clear();
        self.metrics.set_subscribers(0);
        tracing::info!("🛑 NotificationBroadcaster stopped");
    }
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Message)]
#[rtype(result = "Subscription")]
pub struct Subscribe;

#[derive(Message)]
#[rtype(result = "()")]
pub struct Unsubscribe {
    pub id: Uuid,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Publish {
    pub notification: Notification,
}

#[derive(Message)]
#[rtype(result = "usize")]
pub struct SubscriberCount;

#[derive(Message)]
#[rtype(result = "()")]
pub struct Shutdown;

/// A live subscription. Dropping it unsubscribes.
pub struct Subscription {
    id: Uuid,
    receiver: mpsc::Receiver<Notification>,
    broadcaster: Addr<NotificationBroadcaster>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Next notification, or `None` once the broadcaster has gone away.
    pub async fn recv(&mut self) -> Option<Notification> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.broadcaster.do_send(Unsubscribe { id: self.id });
    }
}

// ============================================================================
// Handlers
// ============================================================================

impl Handler<Subscribe> for NotificationBroadcaster {
    type Result = MessageResult<Subscribe>;

    fn handle(&mut self, _: Subscribe, ctx: &mut Self::Context) -> Self::Result {
        let id = Uuid::new_v4();
        let (sender, receiver) = mpsc::channel(self.subscriber_buffer);

        self.subscribers.insert(id, sender);
        self.metrics.set_subscribers(self.subscribers.len());

        tracing::info!(subscriber_id = %id, total = self.subscribers.len(), "📡 Subscriber connected");

        MessageResult(Subscription {
            id,
            receiver,
            broadcaster: ctx.address(),
        })
    }
}

impl Handler<Unsubscribe> for NotificationBroadcaster {
    type Result = ();

    fn handle(&mut self, msg: Unsubscribe, _: &mut Self::Context) {
        self.remove_subscriber(msg.id);
    }
}

impl Handler<Publish> for NotificationBroadcaster {
    type Result = ();

    fn handle(&mut self, msg: Publish, _: &mut Self::Context) {
        let event_name = msg.notification.name();
        let mut delivered = 0usize;
        let mut disconnected = Vec::new();

        for (id, sender) in &self.subscribers {
            match sender.try_send(msg.notification.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    self.metrics.record_notification_dropped("queue_full");
                    tracing::warn!(
                        subscriber_id = %id,
                        event = event_name,
                        "Subscriber queue full, dropping notification"
                    );
                }
                Err(TrySendError::Closed(_)) => {
                    self.metrics.record_notification_dropped("disconnected");
                    disconnected.push(*id);
                }
            }
        }

        for id in disconnected {
            self.remove_subscriber(id);
        }

        self.metrics.record_notification_published(event_name);

        tracing::debug!(
            event = event_name,
            order_id = %msg.notification.order_id(),
            delivered = delivered,
            "Notification fanned out"
        );
    }
}

impl Handler<SubscriberCount> for NotificationBroadcaster {
    type Result = usize;

    fn handle(&mut self, _: SubscriberCount, _: &mut Self::Context) -> usize {
        self.subscribers.len()
    }
}

impl Handler<Shutdown> for NotificationBroadcaster {
    type Result = ();

    fn handle(&mut self, _: Shutdown, ctx: &mut Self::Context) {
        tracing::info!("NotificationBroadcaster received shutdown signal");
        ctx.stop();
    }
}

// ============================================================================
// Handle - what the rest of the service holds
// ============================================================================

#[derive(Clone)]
pub struct BroadcasterHandle {
    addr: Addr<NotificationBroadcaster>,
    metrics: Arc<Metrics>,
}

impl BroadcasterHandle {
    pub fn new(addr: Addr<NotificationBroadcaster>, metrics: Arc<Metrics>) -> Self {
        Self { addr, metrics }
    }

    pub async fn subscribe(&self) -> Result<Subscription, BroadcastError> {
        self.addr
            .send(Subscribe)
            .await
            .map_err(|_| BroadcastError::Unavailable)
    }

    pub async fn subscriber_count(&self) -> Result<usize, BroadcastError> {
        self.addr
            .send(SubscriberCount)
            .await
            .map_err(|_| BroadcastError::Unavailable)
    }

    pub fn shutdown(&self) {
        self.addr.do_send(Shutdown);
    }
}

impl OrderNotifier for BroadcasterHandle {
    fn publish(&self, event: OrderEvent) -> Result<(), BroadcastError> {
        let notification = Arc::new(event);

        self.addr
            .try_send(Publish { notification })
            .map_err(|e| match e {
                SendError::Full(_) => {
                    self.metrics.record_notification_dropped("overloaded");
                    BroadcastError::Overloaded
                }
                SendError::Closed(_) => {
                    self.metrics.record_notification_dropped("broadcaster_unavailable");
                    BroadcastError::Unavailable
                }
            })
    }
}
