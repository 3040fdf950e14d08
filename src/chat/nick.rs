use parking_lot::Mutex;
use rand::Rng;
use std::collections::HashMap;

pub const NICK_PREFIX: &str = "guest";

/// Random display names keyed by connection identity.
///
/// Entries live as long as the process; nothing removes them.
#[derive(Default)]
pub struct NickAllocator {
    nicks: Mutex<HashMap<String, String>>,
}

impl NickAllocator {
    pub fn new() -> Self { Self::default() }

    /// Picks a fresh nick for `identity`, replacing any earlier one.
    pub fn generate(&self, identity: &str) -> String {
        let n: u32 = rand::thread_rng().gen_range(0..100_000);
        let nick = format!("{NICK_PREFIX}{n:05}");
        self.nicks.lock().insert(identity.to_owned(), nick.clone());
        nick
    }

    pub fn get(&self, identity: &str) -> Option<String> {
        self.nicks.lock().get(identity).cloned()
    }
}
