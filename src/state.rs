use std::sync::Arc;

use crate::chat::{Broadcaster, NickAllocator, ScrollbackLog, Stats};

/* ------------ shared chat state ------------ */
/// Built once in `main` and handed to routes through an `Extension` layer.
#[derive(Clone)]
pub struct ChatState {
    pub broadcaster: Arc<Broadcaster>,
    pub scrollback:  Arc<ScrollbackLog>,
    pub nicks:       Arc<NickAllocator>,
    pub stats:       Arc<Stats>,
}

impl ChatState {
    /// Wires the core together and starts the scroll-back consumer.
    /// Must be called inside a tokio runtime.
    pub fn new(queue_depth: usize, log_size: usize) -> Self {
        let stats       = Arc::new(Stats::default());
        let broadcaster = Arc::new(Broadcaster::new(queue_depth, stats.clone()));
        let scrollback  = Arc::new(ScrollbackLog::new(log_size));
        scrollback.spawn(&broadcaster);
        Self { broadcaster, scrollback, nicks: Arc::new(NickAllocator::new()), stats }
    }
}
