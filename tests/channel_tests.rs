mod common;
use common::*;

use telemetry_widgets::{BindingError, LatestValueChannel, Termination};

#[test]
fn new_subscriber_receives_current_value_first() {
    let channel: LatestValueChannel<u32> = LatestValueChannel::new(0);
    channel.on_next(7);

    let mut late = channel.subscribe();
    assert_eq!(late.try_next(), Some(7));
    assert_eq!(late.try_next(), None);

    channel.on_next(8);
    assert_eq!(late.try_next(), Some(8));
}

#[test]
fn subscriber_on_untouched_channel_sees_default() {
    let channel: LatestValueChannel<bool> = LatestValueChannel::new(false);
    let mut subscriber = channel.subscribe();

    assert_eq!(subscriber.try_next(), Some(false));
    assert_eq!(channel.version(), 0);
}

#[test]
fn every_subscriber_tracks_its_own_position() {
    let channel: LatestValueChannel<i64> = LatestValueChannel::new(-1);
    let mut first = channel.subscribe();
    let mut second = channel.subscribe();

    assert_eq!(first.try_next(), Some(-1));
    channel.on_next(10);

    assert_eq!(first.try_next(), Some(10));
    assert_eq!(second.try_next(), Some(10));
    assert_eq!(second.try_next(), None);
}

#[test]
fn get_value_never_waits_and_reflects_last_write() {
    let channel: LatestValueChannel<u8> = LatestValueChannel::new(0);
    for value in 1..=5 {
        channel.on_next(value);
    }
    assert_eq!(channel.get_value(), 5);
    assert_eq!(channel.version(), 5);
}

#[test]
fn completion_stops_delivery() {
    let channel: LatestValueChannel<u32> = LatestValueChannel::new(1);
    let mut subscriber = channel.subscribe();

    channel.on_complete();
    channel.on_next(2);

    assert_eq!(channel.termination(), Some(Termination::Completed));
    assert_eq!(channel.get_value(), 1);
    assert!(subscriber.is_closed());
    assert_eq!(subscriber.try_next(), None);
    assert_eq!(run(subscriber.next()), None);
}

#[test]
fn first_termination_wins() {
    let channel: LatestValueChannel<u32> = LatestValueChannel::new(0);

    channel.on_error(BindingError::BusUnavailable);
    channel.on_complete();

    assert_eq!(
        channel.termination(),
        Some(Termination::Failed(BindingError::BusUnavailable))
    );
}

#[test]
fn next_resolves_with_pending_value() {
    let channel: LatestValueChannel<u32> = LatestValueChannel::new(0);
    let mut subscriber = channel.subscribe();

    assert_eq!(run(subscriber.next()), Some(0));
    channel.on_next(3);
    channel.on_next(4);
    assert_eq!(run(subscriber.next()), Some(4));
}

#[test]
fn reset_publishes_default_to_subscribers() {
    let channel: LatestValueChannel<u32> = LatestValueChannel::new(9);
    channel.on_next(1);
    let mut subscriber = channel.subscribe();
    assert_eq!(subscriber.try_next(), Some(1));

    channel.reset();

    assert_eq!(subscriber.try_next(), Some(9));
    assert_eq!(*channel.default_value(), 9);
}
