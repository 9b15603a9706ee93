// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only traversal of an interval map through a subresource selection.

use core::fmt;

use understory_range_map::{IndexRange, IndexType, IntervalMap};

use crate::encoder::RangeEncoder;
use crate::generator::RangeGenerator;
use crate::trace::ViewTrace;
use crate::types::{Subresource, SubresourceRange};

/// A view of per-subresource state stored in an [`IntervalMap`] keyed by linear index.
///
/// Iterating the view over a selection visits every selected subresource that has a value,
/// in encoding order, and skips those without one. The map is queried once per constant
/// value run rather than once per subresource: the iterator remembers the entry it found
/// and the index where that run ends, and only looks up again after passing it.
///
/// ```rust
/// use understory_range_map::{IndexRange, IntervalMap, TreeIntervalMap};
/// use understory_subresource::{AspectFlags, MapView, RangeEncoder, SubresourceRange};
///
/// let encoder = RangeEncoder::new(SubresourceRange::full(AspectFlags::COLOR, 2, 4));
/// let mut map = TreeIntervalMap::new();
/// map.insert(IndexRange::new(2, 6), "transfer");
///
/// let view = MapView::new(&map, &encoder);
/// let visited: Vec<_> = view
///     .iter(SubresourceRange::new(AspectFlags::COLOR, 0, 2, 1, 2))
///     .map(|item| (item.subresource.mip_level, item.subresource.array_layer, *item.value))
///     .collect();
/// assert_eq!(visited, [(0, 2, "transfer"), (1, 1, "transfer")]);
/// ```
pub struct MapView<'a, M> {
    map: &'a M,
    encoder: &'a RangeEncoder,
}

impl<M> Clone for MapView<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for MapView<'_, M> {}

impl<M: fmt::Debug> fmt::Debug for MapView<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapView")
            .field("map", self.map)
            .field("encoder", self.encoder)
            .finish()
    }
}

impl<'a, M: IntervalMap> MapView<'a, M> {
    /// Creates a view of `map`, whose keys are indices of `encoder`'s domain.
    #[must_use]
    pub fn new(map: &'a M, encoder: &'a RangeEncoder) -> Self {
        Self { map, encoder }
    }

    /// The viewed map.
    #[must_use]
    pub fn map(&self) -> &'a M {
        self.map
    }

    /// The encoder keying the map.
    #[must_use]
    pub fn encoder(&self) -> &'a RangeEncoder {
        self.encoder
    }

    /// Iterates the subresources of `range` that have a value.
    ///
    /// # Panics
    ///
    /// Panics if `range` does not fit the encoder's domain.
    #[must_use]
    pub fn iter(&self, range: SubresourceRange) -> MapViewIter<'a, M> {
        self.iter_with_trace(range, ())
    }

    /// Iterates every subresource of the image that has a value.
    #[must_use]
    pub fn iter_full(&self) -> MapViewIter<'a, M> {
        self.iter(*self.encoder.full_range())
    }

    /// Iterates the subresources of `range` that have a value, reporting to `trace`.
    ///
    /// # Panics
    ///
    /// Panics if `range` does not fit the encoder's domain.
    #[must_use]
    pub fn iter_with_trace<S: ViewTrace>(
        &self,
        range: SubresourceRange,
        trace: S,
    ) -> MapViewIter<'a, M, S> {
        MapViewIter::new(self.map, RangeGenerator::new(self.encoder, range), trace)
    }
}

impl<'a, M: IntervalMap> IntoIterator for &MapView<'a, M> {
    type Item = MapViewItem<'a, M::Value>;
    type IntoIter = MapViewIter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_full()
    }
}

/// One subresource visited by a [`MapViewIter`].
pub struct MapViewItem<'a, V> {
    /// The subresource's coordinate.
    pub subresource: Subresource,
    /// The subresource's linear index.
    pub index: IndexType,
    /// Key of the map entry holding the value.
    pub entry: IndexRange,
    /// The value.
    pub value: &'a V,
}

impl<V> Clone for MapViewItem<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for MapViewItem<'_, V> {}

impl<V: fmt::Debug> fmt::Debug for MapViewItem<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapViewItem")
            .field("subresource", &self.subresource)
            .field("index", &self.index)
            .field("entry", &self.entry)
            .field("value", self.value)
            .finish()
    }
}

/// Iterator over the valued subresources of a selection.
///
/// Created by [`MapView::iter`] and [`MapView::iter_with_trace`].
pub struct MapViewIter<'a, M: IntervalMap, S = ()> {
    map: &'a M,
    ranges: RangeGenerator<'a>,
    entry: Option<(IndexRange, &'a M::Value)>,
    current_index: IndexType,
    constant_value_bound: IndexType,
    done: bool,
    trace: S,
}

impl<M: IntervalMap, S> fmt::Debug for MapViewIter<'_, M, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapViewIter")
            .field("ranges", &self.ranges)
            .field("entry", &self.entry.map(|(key, _)| key))
            .field("current_index", &self.current_index)
            .field("constant_value_bound", &self.constant_value_bound)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<'a, M: IntervalMap, S: ViewTrace> MapViewIter<'a, M, S> {
    fn new(map: &'a M, ranges: RangeGenerator<'a>, trace: S) -> Self {
        let mut iter = Self {
            map,
            current_index: ranges.current().begin,
            ranges,
            entry: None,
            constant_value_bound: 0,
            done: false,
            trace,
        };
        iter.update_range_and_value();
        iter
    }

    /// Returns `true` once every valued subresource has been visited.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.done
    }

    /// Linear index of the next subresource to visit.
    #[must_use]
    pub fn current_index(&self) -> IndexType {
        self.current_index
    }

    /// End of the run of indices sharing the next subresource's value.
    #[must_use]
    pub fn constant_value_bound(&self) -> IndexType {
        self.constant_value_bound
    }

    /// The trace sink.
    #[must_use]
    pub fn trace(&self) -> &S {
        &self.trace
    }

    /// Consumes the iterator, returning its trace sink.
    #[must_use]
    pub fn into_trace(self) -> S {
        self.trace
    }

    /// Positions the iterator on the first valued index at or after `current_index`.
    fn update_range_and_value(&mut self) {
        loop {
            if self.ranges.is_at_end() {
                self.force_end();
                return;
            }
            let range = self.ranges.current();
            if self.current_index >= range.end {
                self.ranges.advance();
                self.trace.generator_step(self.ranges.current());
                self.current_index = self.ranges.current().begin;
                continue;
            }

            // A cached entry ending past the index is still its lower bound.
            let index = self.current_index;
            let map = self.map;
            let cached = self.entry.filter(|(key, _)| key.end > index);
            let Some((key, value)) = cached.or_else(|| {
                self.trace.map_lookup(index);
                map.lower_bound(index)
            }) else {
                // Nothing valued remains anywhere in the selection.
                self.entry = None;
                self.trace.gap_skip(index, range.end);
                self.current_index = range.end;
                self.force_end();
                return;
            };
            self.entry = Some((key, value));

            if key.includes(self.current_index) {
                self.constant_value_bound = key.end.min(range.end);
                self.trace.value_run(
                    IndexRange::new(self.current_index, self.constant_value_bound),
                    key,
                );
                return;
            }

            let to = key.begin.min(range.end);
            self.trace.gap_skip(self.current_index, to);
            self.current_index = to;
            self.constant_value_bound = to;
            if to < range.end {
                self.ranges.cursor_mut().seek(to);
            }
        }
    }

    fn force_end(&mut self) {
        if !self.done {
            self.done = true;
            self.ranges.cursor_mut().set_end();
            self.trace.end();
        }
    }
}

impl<'a, M: IntervalMap, S: ViewTrace> Iterator for MapViewIter<'a, M, S> {
    type Item = MapViewItem<'a, M::Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let (entry, value) = self.entry?;
        let item = MapViewItem {
            subresource: *self.ranges.subresource(),
            index: self.current_index,
            entry,
            value,
        };
        self.current_index += 1;
        self.ranges.cursor_mut().advance();
        if self.current_index >= self.constant_value_bound {
            self.update_range_and_value();
        }
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::AspectFlags;
    use crate::trace::{ViewEvent, ViewTraceRecorder};
    use alloc::vec::Vec;
    use understory_range_map::TreeIntervalMap;

    #[test]
    fn run_is_looked_up_once() {
        let encoder = RangeEncoder::new(SubresourceRange::full(AspectFlags::COLOR, 1, 20));
        let mut map = TreeIntervalMap::new();
        map.insert(IndexRange::new(0, 10), 7_u32);
        let view = MapView::new(&map, &encoder);

        let mut recorder = ViewTraceRecorder::new();
        let items: Vec<_> = view
            .iter_with_trace(*encoder.full_range(), &mut recorder)
            .map(|item| (item.index, *item.value))
            .collect();
        assert_eq!(items.len(), 10);
        assert!(items.iter().all(|&(_, value)| value == 7));
        assert_eq!(
            recorder.events(),
            [
                ViewEvent::MapLookup { index: 0 },
                ViewEvent::ValueRun {
                    run: IndexRange::new(0, 10),
                    entry: IndexRange::new(0, 10),
                },
                ViewEvent::MapLookup { index: 10 },
                ViewEvent::GapSkip { from: 10, to: 20 },
                ViewEvent::End,
            ]
        );
    }

    #[test]
    fn gaps_are_skipped() {
        let encoder = RangeEncoder::new(SubresourceRange::full(AspectFlags::COLOR, 1, 20));
        let mut map = TreeIntervalMap::new();
        map.insert(IndexRange::new(0, 4), 'a');
        map.insert(IndexRange::new(16, 20), 'b');
        let view = MapView::new(&map, &encoder);

        let mut recorder = ViewTraceRecorder::new();
        let layers: Vec<_> = view
            .iter_with_trace(*encoder.full_range(), &mut recorder)
            .map(|item| (item.subresource.array_layer, *item.value))
            .collect();
        assert_eq!(
            layers,
            [
                (0, 'a'),
                (1, 'a'),
                (2, 'a'),
                (3, 'a'),
                (16, 'b'),
                (17, 'b'),
                (18, 'b'),
                (19, 'b'),
            ]
        );
        let gap = ViewEvent::GapSkip { from: 4, to: 16 };
        assert!(recorder.events().contains(&gap));
        assert_eq!(recorder.lookup_count(), 2);
        assert_eq!(recorder.events().last(), Some(&ViewEvent::End));
    }

    #[test]
    fn empty_map_ends_immediately() {
        let encoder = RangeEncoder::new(SubresourceRange::full(AspectFlags::COLOR, 2, 2));
        let map = TreeIntervalMap::<u8>::new();
        let view = MapView::new(&map, &encoder);
        let mut iter = view.iter_full();
        assert!(iter.is_at_end());
        assert!(iter.next().is_none());
    }

    #[test]
    fn runs_are_clipped_to_generator_ranges() {
        let encoder = RangeEncoder::new(SubresourceRange::full(AspectFlags::COLOR, 2, 4));
        let mut map = TreeIntervalMap::new();
        map.insert(IndexRange::new(0, 8), ());
        let view = MapView::new(&map, &encoder);

        let selection = SubresourceRange::new(AspectFlags::COLOR, 0, 2, 1, 2);
        let mut iter = view.iter(selection);
        assert_eq!(iter.current_index(), 1);
        assert_eq!(iter.constant_value_bound(), 3);
        let indices: Vec<_> = iter.by_ref().map(|item| item.index).collect();
        assert_eq!(indices, [1, 2, 5, 6]);
        assert!(iter.is_at_end());
    }
}
