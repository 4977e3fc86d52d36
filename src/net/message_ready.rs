//! 消息就绪事件
//!
//! 应用层向 A 交付第 `msg` 条消息，并按需调度下一条。

use super::gbn_world::GbnWorld;
use crate::sim::{Event, Simulator, World};
use tracing::error;

#[derive(Debug)]
pub struct MessageReady {
    pub msg: u64,
}

impl Event for MessageReady {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let MessageReady { msg } = *self;
        let Some(w) = world.as_any_mut().downcast_mut::<GbnWorld>() else {
            error!("world must be GbnWorld");
            return;
        };
        w.on_message_ready(msg, sim);
    }
}
