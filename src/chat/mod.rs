//! Message fan-out core: the broadcaster, its sinks and their long-lived consumers.

pub mod broadcaster;
pub mod message;
pub mod nick;
pub mod recorder;
pub mod scrollback;
pub mod stats;

pub use broadcaster::{Broadcaster, Sink, SinkId, QUEUE_DEPTH};
pub use message::Message;
pub use nick::NickAllocator;
pub use recorder::FileRecorder;
pub use scrollback::{ScrollbackLog, LOG_SIZE};
pub use stats::{Stats, StatsSnapshot};
