use std::sync::{Arc, Mutex};

use strata_core::application::{GenerationEvent, Severity, ports::Reporter};

/// Reporter that keeps every event in memory.
///
/// Clones share the same buffer. Used by tests and by hosts that render
/// events after a run (for example as JSON).
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    events: Arc<Mutex<Vec<GenerationEvent>>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events reported so far, in order.
    pub fn events(&self) -> Vec<GenerationEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Drain the buffer.
    pub fn take(&self) -> Vec<GenerationEvent> {
        self.events
            .lock()
            .map(|mut e| std::mem::take(&mut *e))
            .unwrap_or_default()
    }

    pub fn warnings(&self) -> Vec<GenerationEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.severity() == Severity::Warning)
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, event: GenerationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_events() {
        let reporter = CollectingReporter::new();
        let handle = reporter.clone();

        handle.report(GenerationEvent::NoNewEntities);
        handle.report(GenerationEvent::MarkerUnresolved {
            marker: "X".into(),
        });

        assert_eq!(reporter.events().len(), 2);
        assert_eq!(reporter.warnings().len(), 1);
        assert_eq!(reporter.take().len(), 2);
        assert!(reporter.events().is_empty());
    }
}
