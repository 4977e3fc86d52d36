//! 重传定时器中断事件

use super::gbn_world::GbnWorld;
use crate::sim::{Event, Simulator, World};
use tracing::error;

/// 事件：A 的重传定时器到期。`generation` 过期（定时器已被停止或重启）时不做任何事。
#[derive(Debug)]
pub struct TimerInterrupt {
    pub generation: u64,
}

impl Event for TimerInterrupt {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let TimerInterrupt { generation } = *self;
        let Some(w) = world.as_any_mut().downcast_mut::<GbnWorld>() else {
            error!("world must be GbnWorld");
            return;
        };
        w.on_timer_interrupt(generation, sim);
    }
}
