use crate::gbn::{GbnConfig, Message, Outbox, Packet, ReceiverState, SenderState, TimerSlot};
use crate::sim::SimTime;

pub(crate) const PAYLOAD: usize = 20;
pub(crate) const TIMEOUT: SimTime = SimTime(100);

pub(crate) type TestSender = SenderState<Outbox, TimerSlot>;
pub(crate) type TestReceiver = ReceiverState<Outbox>;

pub(crate) fn cfg(window: u32, limit: u32) -> GbnConfig {
    GbnConfig::new(window, limit, PAYLOAD, TIMEOUT).expect("valid config")
}

pub(crate) fn sender(window: u32, limit: u32) -> TestSender {
    SenderState::new(cfg(window, limit), Outbox::default(), TimerSlot::default())
}

pub(crate) fn receiver(window: u32, limit: u32) -> TestReceiver {
    ReceiverState::new(cfg(window, limit), Outbox::default())
}

pub(crate) fn msg(byte: u8) -> Message {
    Message::filled(byte, PAYLOAD)
}

pub(crate) fn ack(n: u32) -> Packet {
    Packet::ack(n, PAYLOAD)
}

pub(crate) fn seqs(pkts: &[Packet]) -> Vec<u32> {
    pkts.iter().map(|p| p.seqnum()).collect()
}

pub(crate) fn acks(pkts: &[Packet]) -> Vec<u32> {
    pkts.iter().map(|p| p.acknum()).collect()
}
