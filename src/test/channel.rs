use crate::gbn::{Message, Packet};
use crate::net::{Channel, ChannelConfig, EntityId, Transit};
use crate::sim::SimTime;

fn config(loss: f64, corrupt: f64) -> ChannelConfig {
    ChannelConfig {
        loss_prob: loss,
        corrupt_prob: corrupt,
        delay: SimTime(1_000),
        jitter: SimTime(9_000),
        reorder: false,
        seed: 7,
    }
}

fn data(seq: u32) -> Packet {
    Packet::data(seq, &Message::filled(b'q', 20))
}

#[test]
fn certain_loss_drops_every_packet() {
    let mut ch = Channel::new(config(1.0, 0.0));
    for seq in 0..5 {
        assert!(matches!(ch.transmit(EntityId::A, data(seq), SimTime::ZERO), Transit::Lost));
    }
    assert!(matches!(ch.transmit(EntityId::B, Packet::ack(0, 20), SimTime::ZERO), Transit::Lost));

    assert_eq!(ch.stats().lost_from(EntityId::A), 5);
    assert_eq!(ch.stats().lost_from(EntityId::B), 1);
    assert_eq!(ch.stats().total_lost(), 6);
    assert_eq!(ch.stats().total_corrupted(), 0);
}

#[test]
fn clean_channel_delivers_unmodified_within_delay_bounds() {
    let mut ch = Channel::new(config(0.0, 0.0));
    let now = SimTime(50_000);
    let sent = data(3);

    let Transit::Deliver { at, pkt, corrupted } = ch.transmit(EntityId::A, sent.clone(), now) else {
        panic!("clean channel lost a packet");
    };
    assert!(!corrupted);
    assert_eq!(pkt, sent);
    assert!(at >= now.after(SimTime(1_000)));
    assert!(at <= now.after(SimTime(10_000)));
}

#[test]
fn certain_corruption_is_detectable_by_checksum() {
    let mut ch = Channel::new(config(0.0, 1.0));
    for seq in 0..20 {
        let Transit::Deliver { pkt, corrupted, .. } = ch.transmit(EntityId::A, data(seq), SimTime::ZERO)
        else {
            panic!("lossless channel dropped a packet");
        };
        assert!(corrupted);
        assert!(pkt.is_corrupt(), "corruption of seq {seq} went unnoticed");
    }
    assert_eq!(ch.stats().corrupted_from(EntityId::A), 20);
    assert_eq!(ch.stats().corrupted_from(EntityId::B), 0);
}

#[test]
fn arrivals_in_one_direction_are_fifo() {
    let mut ch = Channel::new(config(0.0, 0.0));
    let mut last = SimTime::ZERO;
    for seq in 0..50 {
        // All sent at the same instant; jitter alone would scramble them.
        let Transit::Deliver { at, .. } = ch.transmit(EntityId::A, data(seq), SimTime::ZERO) else {
            panic!("clean channel lost a packet");
        };
        assert!(at >= last, "seq {seq} overtook its predecessor");
        last = at;
    }
}

#[test]
fn directions_do_not_share_fifo_state() {
    let mut ch = Channel::new(ChannelConfig {
        jitter: SimTime::ZERO,
        ..config(0.0, 0.0)
    });
    for seq in 0..10 {
        ch.transmit(EntityId::A, data(seq), SimTime::ZERO);
    }
    let Transit::Deliver { at, .. } = ch.transmit(EntityId::B, Packet::ack(0, 20), SimTime::ZERO) else {
        panic!("clean channel lost a packet");
    };
    assert_eq!(at, SimTime(1_000));
}

#[test]
fn same_seed_gives_same_fate() {
    let fates = |seed| {
        let mut ch = Channel::new(ChannelConfig {
            seed,
            ..config(0.3, 0.3)
        });
        (0..100)
            .map(|seq| match ch.transmit(EntityId::A, data(seq), SimTime::ZERO) {
                Transit::Lost => None,
                Transit::Deliver { at, corrupted, .. } => Some((at, corrupted)),
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(fates(11), fates(11));
}
