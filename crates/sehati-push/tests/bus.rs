use futures::StreamExt;

use sehati_push::bus::EventBus;

#[tokio::test]
async fn every_subscriber_gets_each_event() {
    let bus = EventBus::new();
    let mut a = bus.subscribe();
    let mut b = bus.subscribe();

    assert_eq!(bus.publish("satu"), 2);
    assert_eq!(a.recv().await, Some("satu"));
    assert_eq!(b.recv().await, Some("satu"));
}

#[tokio::test]
async fn explicit_unsubscribe_ends_the_subscription() {
    let bus = EventBus::new();
    let mut sub = bus.subscribe();

    assert!(bus.unsubscribe(sub.id()));
    assert!(!bus.unsubscribe(sub.id()));
    assert_eq!(bus.publish(1), 0);
    assert_eq!(sub.recv().await, None);
}

#[tokio::test]
async fn dropping_the_handle_unsubscribes() {
    let bus: EventBus<u32> = EventBus::new();
    let sub = bus.subscribe();
    assert_eq!(bus.subscriber_count(), 1);

    drop(sub);
    assert_eq!(bus.subscriber_count(), 0);
    assert_eq!(bus.publish(7), 0);
}

#[tokio::test]
async fn publishing_without_subscribers_is_a_no_op() {
    let bus: EventBus<String> = EventBus::new();
    assert_eq!(bus.publish("x".to_string()), 0);
}

#[tokio::test]
async fn stream_yields_events_and_drop_unsubscribes() {
    let bus = EventBus::new();
    let stream = bus.subscribe().into_stream();
    bus.publish(1);
    bus.publish(2);

    let got: Vec<i32> = stream.take(2).collect().await;
    assert_eq!(got, vec![1, 2]);
    assert_eq!(bus.subscriber_count(), 0);
}

#[tokio::test]
async fn lagging_subscriber_drops_events_instead_of_growing() {
    let bus = EventBus::with_capacity(2);
    let mut slow = bus.subscribe();

    assert_eq!(bus.publish(1), 1);
    assert_eq!(bus.publish(2), 1);
    assert_eq!(bus.publish(3), 0);
    assert_eq!(bus.subscriber_count(), 1);

    assert_eq!(slow.recv().await, Some(1));
    assert_eq!(slow.recv().await, Some(2));
    assert_eq!(slow.try_recv(), None);

    assert_eq!(bus.publish(4), 1);
    assert_eq!(slow.recv().await, Some(4));
}
