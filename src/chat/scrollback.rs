use parking_lot::Mutex;
use std::{collections::VecDeque, sync::Arc};
use tokio::task::JoinHandle;

use super::{
    broadcaster::{Broadcaster, Sink},
    message::Message,
};

pub const LOG_SIZE: usize = 30;

/// The most recent messages, replayed to clients as they join.
pub struct ScrollbackLog {
    cap:  usize,
    msgs: Mutex<VecDeque<Message>>,
}

impl ScrollbackLog {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self { cap, msgs: Mutex::new(VecDeque::with_capacity(cap)) }
    }

    /// Registers a sink on `br` and keeps the log fed from it until that sink closes.
    pub fn spawn(self: &Arc<Self>, br: &Broadcaster) -> JoinHandle<()> {
        let sink = br.new_sink();
        tokio::spawn(Arc::clone(self).run(sink))
    }

    async fn run(self: Arc<Self>, mut sink: Sink) {
        while let Some(msg) = sink.recv().await {
            self.record(msg);
        }
    }

    pub fn record(&self, msg: Message) {
        let mut msgs = self.msgs.lock();
        if msgs.len() == self.cap {
            msgs.pop_front();
        }
        msgs.push_back(msg);
    }

    /// Oldest first.
    pub fn snapshot(&self) -> Vec<Message> {
        self.msgs.lock().iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::stats::Stats;
    use std::time::Duration;

    #[test]
    fn keeps_last_thirty() {
        let log = ScrollbackLog::new(LOG_SIZE);
        for i in 1..=31 {
            log.record(Message::new(format!("m{i}"), "u"));
        }
        let got: Vec<_> = log.snapshot().into_iter().map(|m| m.content).collect();
        let want: Vec<_> = (2..=31).map(|i| format!("m{i}")).collect();
        assert_eq!(got, want);
    }

    #[test]
    fn snapshot_is_a_copy() {
        let log = ScrollbackLog::new(2);
        log.record(Message::new("a", "u"));
        let snap = log.snapshot();
        log.record(Message::new("b", "u"));
        log.record(Message::new("c", "u"));
        assert_eq!(snap.len(), 1);
        assert_eq!(log.snapshot()[0].content, "b");
    }

    #[tokio::test]
    async fn fed_from_broadcaster() {
        let br = Broadcaster::new(10, Arc::new(Stats::default()));
        let log = Arc::new(ScrollbackLog::new(LOG_SIZE));
        let task = log.spawn(&br);

        for i in 0..5 {
            br.broadcast(&Message::new(i.to_string(), "u"));
        }
        tokio::time::timeout(Duration::from_secs(2), async {
            while log.snapshot().len() < 5 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        let got: Vec<_> = log.snapshot().into_iter().map(|m| m.content).collect();
        assert_eq!(got, ["0", "1", "2", "3", "4"]);

        drop(br);
        tokio::time::timeout(Duration::from_secs(2), task).await.unwrap().unwrap();
    }
}
