//! 分组到达事件
//!
//! 信道把一个（可能已损坏的）分组交给目的实体。

use super::gbn_world::GbnWorld;
use super::id::EntityId;
use crate::gbn::Packet;
use crate::sim::{Event, Simulator, World};
use tracing::{error, trace};

/// 事件：把一个 packet 交给某个实体处理。
#[derive(Debug)]
pub struct DeliverPacket {
    pub to: EntityId,
    pub pkt: Packet,
}

impl Event for DeliverPacket {
    #[tracing::instrument(level = "debug", skip(self, sim, world), fields(to = ?self.to, seq = self.pkt.seqnum(), ack = self.pkt.acknum()))]
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let DeliverPacket { to, pkt } = *self;
        let Some(w) = world.as_any_mut().downcast_mut::<GbnWorld>() else {
            error!("world must be GbnWorld");
            return;
        };
        w.on_packet_arrival(pkt, to, sim);
        trace!("DeliverPacket::execute 完成");
    }
}
