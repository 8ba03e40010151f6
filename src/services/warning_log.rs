//! Warning capture layer for tracing
//!
//! Forwards the text of every WARN and ERROR event to a channel so the
//! terminal front end can surface it in the status line. Repeats of the same
//! message within a short window are dropped.

use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::Level;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Messages seen within this window are not forwarded again
const DEDUP_WINDOW: Duration = Duration::from_secs(5);

/// Forget old messages once this many are tracked
const MAX_TRACKED: usize = 100;

/// A tracing layer that forwards WARN+ messages through a channel
pub struct WarningLogLayer {
    sender: mpsc::Sender<String>,
    recent: Mutex<HashMap<String, Instant>>,
}

/// Receiving side handed to the front end
pub struct WarningLogHandle {
    pub receiver: mpsc::Receiver<String>,
}

impl WarningLogHandle {
    /// Most recent pending warning, discarding older ones
    pub fn latest(&self) -> Option<String> {
        self.receiver.try_iter().last()
    }
}

/// Create a warning layer and its handle
pub fn create() -> (WarningLogLayer, WarningLogHandle) {
    let (sender, receiver) = mpsc::channel();
    let layer = WarningLogLayer {
        sender,
        recent: Mutex::new(HashMap::new()),
    };
    (layer, WarningLogHandle { receiver })
}

impl WarningLogLayer {
    fn should_forward(&self, message: &str) -> bool {
        let Ok(mut recent) = self.recent.lock() else {
            return true;
        };
        let now = Instant::now();

        if recent.len() > MAX_TRACKED {
            recent.retain(|_, seen| now.duration_since(*seen) < DEDUP_WINDOW);
        }

        match recent.get_mut(message) {
            Some(seen) if now.duration_since(*seen) < DEDUP_WINDOW => {
                *seen = now;
                false
            }
            _ => {
                recent.insert(message.to_string(), now);
                true
            }
        }
    }
}

impl<S> Layer<S> for WarningLogLayer
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() > Level::WARN {
            return;
        }

        let mut visitor = StringVisitor::default();
        event.record(&mut visitor);

        if self.should_forward(&visitor.0) {
            // Receiver gone means the front end has exited
            let _ = self.sender.send(visitor.0);
        }
    }
}

/// Simple visitor to extract message from event
#[derive(Default)]
struct StringVisitor(String);

impl tracing::field::Visit for StringVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        } else if !self.0.is_empty() {
            self.0.push_str(&format!(" {}={:?}", field.name(), value));
        } else {
            self.0 = format!("{}={:?}", field.name(), value);
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.0 = value.to_string();
        } else if !self.0.is_empty() {
            self.0.push_str(&format!(" {}={}", field.name(), value));
        } else {
            self.0 = format!("{}={}", field.name(), value);
        }
    }
}
