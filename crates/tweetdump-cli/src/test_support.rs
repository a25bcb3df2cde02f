use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;

/// Records the fields of every event at `level` emitted by this workspace's
/// crates.
#[derive(Clone)]
pub(crate) struct EventCapture {
    level: tracing::Level,
    events: Arc<Mutex<Vec<String>>>,
}

impl EventCapture {
    pub(crate) fn new(level: tracing::Level) -> Self {
        Self {
            level,
            events: Arc::default(),
        }
    }

    /// Installs the capture as this thread's default subscriber until the
    /// guard drops.
    pub(crate) fn install(&self) -> tracing::subscriber::DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl<S: tracing::Subscriber> Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() != self.level || !meta.target().starts_with("tweetdump") {
            return;
        }
        let mut fields = FieldText::default();
        event.record(&mut fields);
        self.events.lock().unwrap().push(fields.0);
    }
}

#[derive(Default)]
struct FieldText(String);

impl tracing::field::Visit for FieldText {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let _ = write!(self.0, "{}={:?} ", field.name(), value);
    }
}
