//! Channel ordering, back-pressure, and cancellation behaviour.

use std::sync::Arc;

use super::*;
use crate::domain::ports::UserCreatedHandlerError;
use crate::domain::user::fixture_user;
use rstest::rstest;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(2);

/// Forwards every event it sees to the test body.
struct ForwardingHandler {
    seen: UnboundedSender<(UserCreatedEvent, Option<TraceId>)>,
    fail_first: std::sync::Mutex<bool>,
}

impl ForwardingHandler {
    fn new() -> (Arc<Self>, UnboundedReceiver<(UserCreatedEvent, Option<TraceId>)>) {
        let (seen, rx) = unbounded_channel();
        let handler = Arc::new(Self {
            seen,
            fail_first: std::sync::Mutex::new(false),
        });
        (handler, rx)
    }

    fn failing_once() -> (Arc<Self>, UnboundedReceiver<(UserCreatedEvent, Option<TraceId>)>) {
        let (seen, rx) = unbounded_channel();
        let handler = Arc::new(Self {
            seen,
            fail_first: std::sync::Mutex::new(true),
        });
        (handler, rx)
    }
}

#[async_trait]
impl UserCreatedHandler for ForwardingHandler {
    async fn handle(&self, event: UserCreatedEvent) -> Result<(), UserCreatedHandlerError> {
        let fail = std::mem::replace(&mut *self.fail_first.lock().expect("flag lock"), false);
        self.seen
            .send((event, TraceId::current()))
            .expect("test receiver alive");
        if fail {
            return Err(UserCreatedHandlerError::failed("smtp unavailable"));
        }
        Ok(())
    }
}

fn event(email: &str) -> UserCreatedEvent {
    UserCreatedEvent::new(fixture_user(email))
}

fn start_consumer(
    channel: &Arc<UserCreatedEventChannel>,
    handler: Arc<ForwardingHandler>,
) -> (watch::Sender<bool>, JoinHandle<()>) {
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let channel = Arc::clone(channel);
    let task = tokio::spawn(async move {
        channel.consume(handler.as_ref(), cancel_rx).await;
    });
    (cancel_tx, task)
}

async fn next_seen(
    rx: &mut UnboundedReceiver<(UserCreatedEvent, Option<TraceId>)>,
) -> (UserCreatedEvent, Option<TraceId>) {
    timeout(WAIT, rx.recv())
        .await
        .expect("event delivered in time")
        .expect("handler still running")
}

#[rstest]
fn reports_configuration() {
    let channel = UserCreatedEventChannel::new(3, Duration::from_millis(50));
    assert_eq!(channel.capacity(), 3);
    assert_eq!(channel.publish_timeout(), Duration::from_millis(50));
    assert!(channel.is_empty());
}

#[rstest]
fn zero_capacity_is_raised_to_one() {
    let channel = UserCreatedEventChannel::new(0, DEFAULT_PUBLISH_TIMEOUT);
    assert_eq!(channel.capacity(), 1);
}

#[rstest]
fn defaults_match_constants() {
    let channel = UserCreatedEventChannel::default();
    assert_eq!(channel.capacity(), DEFAULT_EVENT_CHANNEL_CAPACITY);
    assert_eq!(channel.publish_timeout(), DEFAULT_PUBLISH_TIMEOUT);
}

#[tokio::test]
async fn events_are_delivered_in_publish_order() {
    let channel = Arc::new(UserCreatedEventChannel::new(5, Duration::from_millis(50)));
    let emails: Vec<String> = (0..5).map(|n| format!("user{n}@example.com")).collect();
    let mut published = Vec::new();
    for email in &emails {
        let event = event(email);
        published.push(event.clone());
        channel.publish(event).await.expect("capacity available");
    }
    assert_eq!(channel.len(), 5);

    let (handler, mut rx) = ForwardingHandler::new();
    let (cancel, task) = start_consumer(&channel, handler);
    for expected in &published {
        let (seen, _) = next_seen(&mut rx).await;
        assert_eq!(&seen, expected);
    }

    cancel.send(true).expect("consumer listening");
    timeout(WAIT, task).await.expect("consumer stops").expect("no panic");
    assert!(channel.is_empty());
}

#[tokio::test]
async fn full_channel_times_out_without_consumer() {
    let channel = UserCreatedEventChannel::new(2, Duration::from_millis(20));
    channel.publish(event("a@example.com")).await.expect("first");
    channel.publish(event("b@example.com")).await.expect("second");

    let result = channel.publish(event("c@example.com")).await;
    assert_eq!(result, Err(EventPublishError::timeout(20_u64)));
    assert_eq!(channel.len(), channel.capacity());
}

#[tokio::test]
async fn blocked_publish_completes_once_consumer_frees_a_slot() {
    let channel = Arc::new(UserCreatedEventChannel::new(1, Duration::from_secs(2)));
    channel.publish(event("a@example.com")).await.expect("first");

    let publisher = {
        let channel = Arc::clone(&channel);
        tokio::spawn(async move { channel.publish(event("b@example.com")).await })
    };

    let (handler, mut rx) = ForwardingHandler::new();
    let (cancel, task) = start_consumer(&channel, handler);

    let (first, _) = next_seen(&mut rx).await;
    assert_eq!(first.user().email().as_ref(), "a@example.com");
    timeout(WAIT, publisher)
        .await
        .expect("publisher unblocked")
        .expect("no panic")
        .expect("publish succeeded");
    let (second, _) = next_seen(&mut rx).await;
    assert_eq!(second.user().email().as_ref(), "b@example.com");

    cancel.send(true).expect("consumer listening");
    timeout(WAIT, task).await.expect("consumer stops").expect("no panic");
}

#[tokio::test]
async fn cancellation_stops_idle_consumer_and_closes_channel() {
    let channel = Arc::new(UserCreatedEventChannel::new(4, Duration::from_millis(20)));
    let (handler, _rx) = ForwardingHandler::new();
    let (cancel, task) = start_consumer(&channel, handler);

    cancel.send(true).expect("consumer listening");
    timeout(WAIT, task).await.expect("consumer stops").expect("no panic");

    let result = channel.publish(event("late@example.com")).await;
    assert_eq!(result, Err(EventPublishError::closed()));
}

#[tokio::test]
async fn dropping_the_cancel_sender_stops_the_consumer() {
    let channel = Arc::new(UserCreatedEventChannel::new(4, Duration::from_millis(20)));
    let (handler, _rx) = ForwardingHandler::new();
    let (cancel, task) = start_consumer(&channel, handler);

    drop(cancel);
    timeout(WAIT, task).await.expect("consumer stops").expect("no panic");
}

#[tokio::test]
async fn handler_failures_do_not_stop_the_loop() {
    let channel = Arc::new(UserCreatedEventChannel::new(4, Duration::from_millis(50)));
    let (handler, mut rx) = ForwardingHandler::failing_once();
    let (cancel, task) = start_consumer(&channel, handler);

    channel.publish(event("one@example.com")).await.expect("first");
    channel.publish(event("two@example.com")).await.expect("second");

    let (first, _) = next_seen(&mut rx).await;
    let (second, _) = next_seen(&mut rx).await;
    assert_eq!(first.user().email().as_ref(), "one@example.com");
    assert_eq!(second.user().email().as_ref(), "two@example.com");

    cancel.send(true).expect("consumer listening");
    timeout(WAIT, task).await.expect("consumer stops").expect("no panic");
}

#[tokio::test]
async fn handlers_run_inside_the_publishing_trace() {
    let channel = Arc::new(UserCreatedEventChannel::new(4, Duration::from_millis(50)));
    let trace_id = TraceId::generate();
    let traced = TraceId::scope(trace_id, async { event("traced@example.com") }).await;
    channel.publish(traced).await.expect("publish");

    let (handler, mut rx) = ForwardingHandler::new();
    let (cancel, task) = start_consumer(&channel, handler);

    let (_, seen_trace) = next_seen(&mut rx).await;
    assert_eq!(seen_trace, Some(trace_id));

    cancel.send(true).expect("consumer listening");
    timeout(WAIT, task).await.expect("consumer stops").expect("no panic");
}
