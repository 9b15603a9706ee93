// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explainability hooks for map view traversal.
//!
//! A [`MapView`](crate::MapView) traversal does not record how it moved through the map.
//! When it is useful to see which lookups were made, which gaps were jumped, and where
//! constant-value runs began, pass a [`ViewTrace`] sink to
//! [`MapView::iter_with_trace`](crate::MapView::iter_with_trace).
//!
//! `()` is the no-op sink used by [`MapView::iter`](crate::MapView::iter).
//! [`ViewTraceRecorder`] keeps every event in order.

use alloc::vec::Vec;

use understory_range_map::{IndexRange, IndexType};

/// A callback sink for map view traversal.
///
/// Every callback defaults to doing nothing.
pub trait ViewTrace {
    /// The map was queried for the entry at or after `index`.
    fn map_lookup(&mut self, index: IndexType) {
        let _ = index;
    }

    /// A constant-value run starts: indices in `run` all map to the entry keyed by `entry`.
    fn value_run(&mut self, run: IndexRange, entry: IndexRange) {
        let _ = (run, entry);
    }

    /// Indices `[from, to)` have no entry and were skipped.
    fn gap_skip(&mut self, from: IndexType, to: IndexType) {
        let _ = (from, to);
    }

    /// The underlying range generator moved to `range` (empty once exhausted).
    fn generator_step(&mut self, range: IndexRange) {
        let _ = range;
    }

    /// The traversal finished.
    fn end(&mut self) {}
}

impl ViewTrace for () {}

impl<S: ViewTrace + ?Sized> ViewTrace for &mut S {
    fn map_lookup(&mut self, index: IndexType) {
        (**self).map_lookup(index);
    }

    fn value_run(&mut self, run: IndexRange, entry: IndexRange) {
        (**self).value_run(run, entry);
    }

    fn gap_skip(&mut self, from: IndexType, to: IndexType) {
        (**self).gap_skip(from, to);
    }

    fn generator_step(&mut self, range: IndexRange) {
        (**self).generator_step(range);
    }

    fn end(&mut self) {
        (**self).end();
    }
}

/// One recorded traversal event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    /// See [`ViewTrace::map_lookup`].
    MapLookup {
        /// Index looked up.
        index: IndexType,
    },
    /// See [`ViewTrace::value_run`].
    ValueRun {
        /// Indices sharing the value.
        run: IndexRange,
        /// Key of the map entry.
        entry: IndexRange,
    },
    /// See [`ViewTrace::gap_skip`].
    GapSkip {
        /// First skipped index.
        from: IndexType,
        /// Index traversal resumed at.
        to: IndexType,
    },
    /// See [`ViewTrace::generator_step`].
    GeneratorStep {
        /// The generator's new range.
        range: IndexRange,
    },
    /// See [`ViewTrace::end`].
    End,
}

/// Records every traversal event in order.
#[derive(Clone, Debug, Default)]
pub struct ViewTraceRecorder {
    events: Vec<ViewEvent>,
}

impl ViewTraceRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    /// Number of map lookups recorded so far.
    #[must_use]
    pub fn lookup_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, ViewEvent::MapLookup { .. }))
            .count()
    }

    /// Forgets all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl ViewTrace for ViewTraceRecorder {
    fn map_lookup(&mut self, index: IndexType) {
        self.events.push(ViewEvent::MapLookup { index });
    }

    fn value_run(&mut self, run: IndexRange, entry: IndexRange) {
        self.events.push(ViewEvent::ValueRun { run, entry });
    }

    fn gap_skip(&mut self, from: IndexType, to: IndexType) {
        self.events.push(ViewEvent::GapSkip { from, to });
    }

    fn generator_step(&mut self, range: IndexRange) {
        self.events.push(ViewEvent::GeneratorStep { range });
    }

    fn end(&mut self) {
        self.events.push(ViewEvent::End);
    }
}
