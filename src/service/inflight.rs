use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Recipients with a mint currently between pre-check and confirmation.
#[derive(Debug, Clone, Default)]
pub struct InFlightMints {
    recipients: Arc<Mutex<HashSet<String>>>,
}

impl InFlightMints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the recipient. Returns `None` if another mint already holds it.
    pub fn try_acquire(&self, recipient: &str) -> Option<MintGuard> {
        let key = recipient.to_lowercase();
        let mut recipients = self.recipients.lock().unwrap_or_else(|e| e.into_inner());

        if !recipients.insert(key.clone()) {
            return None;
        }

        Some(MintGuard {
            recipients: self.recipients.clone(),
            key,
        })
    }

    pub fn contains(&self, recipient: &str) -> bool {
        self.recipients
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&recipient.to_lowercase())
    }
}

/// Releases the recipient when dropped.
#[derive(Debug)]
pub struct MintGuard {
    recipients: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl Drop for MintGuard {
    fn drop(&mut self) {
        self.recipients
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.key);
    }
}
