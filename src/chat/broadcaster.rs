use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

use super::{message::Message, stats::Stats};

pub const QUEUE_DEPTH: usize = 10;

/// Handle used to deregister a sink. Cheap to copy into both halves of a connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SinkId(u64);

#[derive(Debug)]
enum Rx {
    Bounded(mpsc::Receiver<Message>),
    Unbounded(mpsc::UnboundedReceiver<Message>),
}

enum Tx {
    Bounded(mpsc::Sender<Message>),
    Unbounded(mpsc::UnboundedSender<Message>),
}

/// Consumer end of a queue fed by the [`Broadcaster`].
///
/// `recv` yields `None` once the sink has been removed and drained.
#[derive(Debug)]
pub struct Sink {
    id: SinkId,
    rx: Rx,
}

impl Sink {
    pub fn id(&self) -> SinkId { self.id }

    pub async fn recv(&mut self) -> Option<Message> {
        match &mut self.rx {
            Rx::Bounded(rx)   => rx.recv().await,
            Rx::Unbounded(rx) => rx.recv().await,
        }
    }

    pub fn try_recv(&mut self) -> Option<Message> {
        match &mut self.rx {
            Rx::Bounded(rx)   => rx.try_recv().ok(),
            Rx::Unbounded(rx) => rx.try_recv().ok(),
        }
    }
}

struct Inner {
    next_id: u64,
    sinks:   Vec<(SinkId, Tx)>,
}

/// Fans one message out to every registered sink without ever blocking.
pub struct Broadcaster {
    depth: usize,
    inner: Mutex<Inner>,
    stats: Arc<Stats>,
}

impl Broadcaster {
    pub fn new(depth: usize, stats: Arc<Stats>) -> Self {
        Self {
            depth: depth.max(1),
            inner: Mutex::new(Inner { next_id: 0, sinks: Vec::new() }),
            stats,
        }
    }

    /// Bounded to the configured depth; overflow is dropped.
    pub fn new_sink(&self) -> Sink {
        let (tx, rx) = mpsc::channel(self.depth);
        self.register(Tx::Bounded(tx), Rx::Bounded(rx))
    }

    /// Never dropped into. For consumers that must see every message.
    pub fn new_unbounded_sink(&self) -> Sink {
        let (tx, rx) = mpsc::unbounded_channel();
        self.register(Tx::Unbounded(tx), Rx::Unbounded(rx))
    }

    fn register(&self, tx: Tx, rx: Rx) -> Sink {
        let mut inner = self.inner.lock();
        let id = SinkId(inner.next_id);
        inner.next_id += 1;
        inner.sinks.push((id, tx));
        self.stats.set_clients(inner.sinks.len());
        Sink { id, rx }
    }

    /// Closes and forgets the sink. Unknown or already removed ids are ignored.
    pub fn del_sink(&self, id: SinkId) {
        let mut inner = self.inner.lock();
        if let Some(pos) = inner.sinks.iter().position(|(sid, _)| *sid == id) {
            // dropping the only sender closes the queue
            inner.sinks.remove(pos);
            self.stats.set_clients(inner.sinks.len());
        }
    }

    pub fn broadcast(&self, msg: &Message) {
        let mut dropped = 0usize;
        {
            let inner = self.inner.lock();
            for (_, tx) in &inner.sinks {
                match tx {
                    Tx::Bounded(tx) => {
                        if let Err(TrySendError::Full(_)) = tx.try_send(msg.clone()) {
                            self.stats.add_drop();
                            dropped += 1;
                        }
                    }
                    // a closed queue means its consumer left without deregistering
                    Tx::Unbounded(tx) => { let _ = tx.send(msg.clone()); }
                }
            }
        }
        if dropped > 0 {
            debug!(dropped, "sinks full, message dropped");
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Broadcaster, Arc<Stats>) {
        let stats = Arc::new(Stats::default());
        (Broadcaster::new(QUEUE_DEPTH, stats.clone()), stats)
    }

    #[test]
    fn every_sink_gets_one_copy_in_order() {
        let (br, stats) = setup();
        let mut sinks: Vec<_> = (0..4).map(|_| br.new_sink()).collect();
        assert_eq!(stats.snapshot().clients, 4);

        br.broadcast(&Message::new("one", "a"));
        br.broadcast(&Message::new("two", "b"));

        for s in &mut sinks {
            assert_eq!(s.try_recv().unwrap().content, "one");
            assert_eq!(s.try_recv().unwrap().content, "two");
            assert!(s.try_recv().is_none());
        }
        assert_eq!(stats.snapshot().msgs_drop, 0);
    }

    #[test]
    fn full_sink_drops_only_its_copy() {
        let (br, stats) = setup();
        let mut slow = br.new_sink();
        let mut fast = br.new_sink();

        for i in 0..QUEUE_DEPTH {
            br.broadcast(&Message::new(i.to_string(), "x"));
            assert_eq!(fast.try_recv().unwrap().content, i.to_string());
        }
        br.broadcast(&Message::new("late", "x"));

        assert_eq!(stats.snapshot().msgs_drop, 1);
        assert_eq!(fast.try_recv().unwrap().content, "late");
        let got: Vec<_> = std::iter::from_fn(|| slow.try_recv()).map(|m| m.content).collect();
        assert_eq!(got.len(), QUEUE_DEPTH);
        assert_eq!(got.last().map(String::as_str), Some("9"));
    }

    #[tokio::test]
    async fn del_sink_closes_after_drain_and_is_idempotent() {
        let (br, stats) = setup();
        let mut a = br.new_sink();
        let mut b = br.new_sink();

        br.broadcast(&Message::new("before", "x"));
        br.del_sink(a.id());
        br.del_sink(a.id());
        br.broadcast(&Message::new("after", "x"));

        assert_eq!(a.recv().await.unwrap().content, "before");
        assert!(a.recv().await.is_none());
        assert_eq!(b.recv().await.unwrap().content, "before");
        assert_eq!(b.recv().await.unwrap().content, "after");
        assert_eq!(br.len(), 1);
        assert_eq!(stats.snapshot().clients, 1);
    }

    #[test]
    fn unknown_id_is_noop() {
        let (br, stats) = setup();
        let _s = br.new_sink();
        br.del_sink(SinkId(42));
        assert_eq!(br.len(), 1);
        assert_eq!(stats.snapshot().clients, 1);
    }

    #[tokio::test]
    async fn unbounded_sink_never_drops() {
        let (br, stats) = setup();
        let mut all = br.new_unbounded_sink();
        let _slow = br.new_sink();

        for i in 0..QUEUE_DEPTH * 3 {
            br.broadcast(&Message::new(i.to_string(), "x"));
        }
        br.del_sink(all.id());

        for i in 0..QUEUE_DEPTH * 3 {
            assert_eq!(all.recv().await.unwrap().content, i.to_string());
        }
        assert!(all.recv().await.is_none());
        assert_eq!(stats.snapshot().msgs_drop, (QUEUE_DEPTH * 2) as i64);
    }
}
