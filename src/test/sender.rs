use super::support::{ack, msg, seqs, sender, PAYLOAD, TIMEOUT};
use crate::gbn::{AckOutcome, Message, MessageError, SendError, SenderPhase, Statistics, TimerCommand, TimerState};
use crate::sim::SimTime;

#[test]
fn first_send_starts_timer_and_later_sends_do_not() {
    let mut s = sender(4, 8);
    let mut stats = Statistics::default();

    assert_eq!(s.on_message_ready(msg(b'a'), SimTime(0), &mut stats).expect("send"), 0);
    assert_eq!(s.timer_mut().take(), vec![TimerCommand::Start(TIMEOUT)]);
    assert_eq!(s.timer_state(), TimerState::Running);

    assert_eq!(s.on_message_ready(msg(b'b'), SimTime(1), &mut stats).expect("send"), 1);
    assert!(s.timer_mut().commands().is_empty());

    assert_eq!(seqs(s.channel_mut().packets()), vec![0, 1]);
    assert_eq!(s.next_seq_num(), 2);
    assert_eq!(s.tx_base(), 0);
    assert_eq!(stats.counters().tx_pkt_count, 2);
}

#[test]
fn full_window_rejects_and_returns_message() {
    let mut s = sender(4, 8);
    let mut stats = Statistics::default();
    for b in 0..4u8 {
        s.on_message_ready(msg(b'a' + b), SimTime(0), &mut stats).expect("room in window");
    }
    assert_eq!(s.phase(), SenderPhase::WindowFull);
    assert_eq!(s.in_flight(), 4);

    let err = s
        .on_message_ready(msg(b'z'), SimTime(0), &mut stats)
        .expect_err("window is full");
    assert!(matches!(err, SendError::WindowFull { base: 0, next: 4, .. }));
    assert_eq!(err.into_message(), Some(msg(b'z')));

    // nothing changed
    assert_eq!(s.in_flight(), 4);
    assert_eq!(s.channel_mut().packets().len(), 4);
    assert_eq!(stats.counters().tx_pkt_count, 4);
}

#[test]
fn wrong_size_message_is_rejected() {
    let mut s = sender(4, 8);
    let mut stats = Statistics::default();
    let err = s
        .on_message_ready(Message::filled(b'x', 3), SimTime(0), &mut stats)
        .expect_err("short message");
    assert!(matches!(
        err,
        SendError::Message(MessageError::PayloadSize { expected: PAYLOAD, actual: 3 })
    ));
    assert_eq!(s.in_flight(), 0);
}

#[test]
fn cumulative_ack_releases_prefix_and_restarts_timer() {
    let mut s = sender(4, 8);
    let mut stats = Statistics::default();
    for b in 0..4u8 {
        s.on_message_ready(msg(b'a' + b), SimTime(10), &mut stats).expect("send");
    }
    s.timer_mut().take();

    let out = s.on_packet_arrival(ack(2), SimTime(50), &mut stats);
    assert_eq!(out, AckOutcome::Advanced { ack: 2, released: 3 });
    assert_eq!(s.tx_base(), 3);
    assert_eq!(s.in_flight(), 1);
    assert_eq!(s.outstanding().collect::<Vec<_>>(), vec![3]);
    assert_eq!(s.timer_mut().take_last(), Some(TimerCommand::Start(TIMEOUT)));
    assert_eq!(s.phase(), SenderPhase::Idle);

    let c = stats.counters();
    assert_eq!(c.comm_pkt_count, 3);
    assert_eq!(c.total_ttc, SimTime(3 * 40));
}

#[test]
fn ack_emptying_window_stops_timer() {
    let mut s = sender(4, 8);
    let mut stats = Statistics::default();
    s.on_message_ready(msg(b'a'), SimTime(0), &mut stats).expect("send");
    s.on_message_ready(msg(b'b'), SimTime(0), &mut stats).expect("send");
    s.timer_mut().take();

    s.on_packet_arrival(ack(1), SimTime(5), &mut stats);
    assert_eq!(s.tx_base(), 2);
    assert_eq!(s.in_flight(), 0);
    assert_eq!(s.timer_mut().take(), vec![TimerCommand::Stop]);
    assert_eq!(s.timer_state(), TimerState::Stopped);
}

#[test]
fn stale_duplicate_and_future_acks_have_no_effect() {
    let mut s = sender(4, 8);
    let mut stats = Statistics::default();
    for b in 0..4u8 {
        s.on_message_ready(msg(b'a' + b), SimTime(0), &mut stats).expect("send");
    }
    s.on_packet_arrival(ack(1), SimTime(1), &mut stats);
    s.timer_mut().take();
    let before = stats.counters();

    for n in [0, 1, 4, 5, 7] {
        assert_eq!(
            s.on_packet_arrival(ack(n), SimTime(2), &mut stats),
            AckOutcome::Ignored { ack: n }
        );
    }
    assert_eq!(s.tx_base(), 2);
    assert_eq!(s.next_seq_num(), 4);
    assert_eq!(s.in_flight(), 2);
    assert!(s.timer_mut().commands().is_empty());
    assert_eq!(stats.counters(), before);
}

#[test]
fn corrupted_ack_is_discarded() {
    let mut s = sender(4, 8);
    let mut stats = Statistics::default();
    for b in 0..3u8 {
        s.on_message_ready(msg(b'a' + b), SimTime(0), &mut stats).expect("send");
    }
    s.timer_mut().take();

    let mut bad = ack(2);
    bad.acknum = 1;
    assert_eq!(s.on_packet_arrival(bad, SimTime(1), &mut stats), AckOutcome::Corrupt);
    assert_eq!(s.tx_base(), 0);
    assert_eq!(s.in_flight(), 3);
    assert!(s.timer_mut().commands().is_empty());
    assert_eq!(stats.counters().corrupt_ack_count, 1);
    assert_eq!(stats.counters().comm_pkt_count, 0);
}

#[test]
fn timeout_resends_outstanding_packets_in_order() {
    let mut s = sender(4, 8);
    let mut stats = Statistics::default();
    for b in 0..4u8 {
        s.on_message_ready(msg(b'a' + b), SimTime(0), &mut stats).expect("send");
    }
    s.on_packet_arrival(ack(0), SimTime(1), &mut stats);
    s.channel_mut().take();
    s.timer_mut().take();

    assert_eq!(s.on_timer_interrupt(SimTime(101), &mut stats), 3);
    let resent = s.channel_mut().take();
    assert_eq!(seqs(&resent), vec![1, 2, 3]);
    assert!(resent.iter().all(|p| !p.is_corrupt()));
    assert_eq!(resent[0].payload(), msg(b'b').as_bytes());
    assert_eq!(stats.counters().rxmt_count, 3);
    assert_eq!(stats.counters().tx_pkt_count, 4);
    assert_eq!(s.timer_mut().take(), vec![TimerCommand::Start(TIMEOUT)]);
    assert_eq!(s.timer_state(), TimerState::Running);
}

#[test]
fn timeout_with_empty_window_is_a_no_op() {
    let mut s = sender(4, 8);
    let mut stats = Statistics::default();
    assert_eq!(s.on_timer_interrupt(SimTime(5), &mut stats), 0);
    assert!(s.channel_mut().packets().is_empty());
    assert!(s.timer_mut().commands().is_empty());
    assert_eq!(stats.counters().rxmt_count, 0);
}

#[test]
fn window_slides_across_wraparound() {
    let mut s = sender(4, 8);
    let mut stats = Statistics::default();

    // Move the window to base 6.
    for round in 0..6u32 {
        let seq = s.on_message_ready(msg(b'a'), SimTime(0), &mut stats).expect("send");
        assert_eq!(seq, round);
        s.on_packet_arrival(ack(seq), SimTime(1), &mut stats);
    }
    assert_eq!(s.tx_base(), 6);
    s.channel_mut().take();

    for _ in 0..4 {
        s.on_message_ready(msg(b'b'), SimTime(2), &mut stats).expect("send");
    }
    assert_eq!(seqs(s.channel_mut().packets()), vec![6, 7, 0, 1]);
    assert_eq!(s.next_seq_num(), 2);
    assert_eq!(s.phase(), SenderPhase::WindowFull);

    // ACK 0 covers 6, 7 and 0.
    assert_eq!(
        s.on_packet_arrival(ack(0), SimTime(3), &mut stats),
        AckOutcome::Advanced { ack: 0, released: 3 }
    );
    assert_eq!(s.tx_base(), 1);
    assert_eq!(
        s.on_packet_arrival(ack(7), SimTime(3), &mut stats),
        AckOutcome::Ignored { ack: 7 }
    );
    assert_eq!(s.outstanding().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn outstanding_never_exceeds_window() {
    let mut s = sender(3, 8);
    let mut stats = Statistics::default();
    let mut accepted = 0;
    for i in 0..40u32 {
        if s.on_message_ready(msg(b'a'), SimTime(i as u64), &mut stats).is_ok() {
            accepted += 1;
        }
        assert!(s.in_flight() <= 3);
        // Acknowledge the oldest packet every third step.
        if i % 3 == 2 {
            let base = s.tx_base();
            s.on_packet_arrival(ack(base), SimTime(i as u64), &mut stats);
        }
    }
    assert_eq!(stats.counters().tx_pkt_count, accepted);
}
