//! Wires user triggered conversions to a single result display.
//!
//! Each trigger is stamped with a generation number. A conversion that
//! finishes after a newer one has been triggered is dropped, so the display
//! always ends up showing the most recently requested result.

use crate::core::converter::Converter;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

/// Output region that conversion results are written to.
pub trait ResultDisplay: Send + Sync {
    fn show(&self, text: &str);
}

/// Sequence number handed out per trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

pub struct ConversionHandler {
    converter: Arc<Converter>,
    display: Arc<dyn ResultDisplay>,
    generation: AtomicU64,
    write_lock: Mutex<()>,
}

impl ConversionHandler {
    pub fn new(converter: Arc<Converter>, display: Arc<dyn ResultDisplay>) -> Self {
        Self {
            converter,
            display,
            generation: AtomicU64::new(0),
            write_lock: Mutex::new(()),
        }
    }

    /// Marks a new user trigger, superseding every earlier one.
    pub fn begin(&self) -> Generation {
        Generation(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Runs one conversion. Returns `true` if its result reached the display.
    pub async fn trigger(&self, amount: &str, from: &str, to: &str) -> bool {
        let generation = self.begin();
        self.run(generation, amount, from, to).await
    }

    /// Runs the conversion for a trigger obtained from [`Self::begin`].
    pub async fn run(&self, generation: Generation, amount: &str, from: &str, to: &str) -> bool {
        let Generation(generation) = generation;
        debug!(generation, amount, from, to, "Conversion triggered");

        let text = self.converter.convert(amount, from, to).await;

        // Check and write under one lock so a stale result cannot land after
        // a newer one.
        let _guard = self.write_lock.lock().await;
        let latest = self.generation.load(Ordering::SeqCst);
        if latest != generation {
            debug!(generation, latest, "Discarding superseded conversion result");
            return false;
        }
        self.display.show(&text);
        true
    }
}
