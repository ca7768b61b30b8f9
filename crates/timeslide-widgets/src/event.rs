#![forbid(unsafe_code)]

//! Slider values in, range-changed events out.

use timeslide_core::selector::{DisplayMode, Selection};

/// A value reported by the host's slider widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderValue {
    Single(usize),
    /// Two handles, in any order.
    Range(usize, usize),
}

impl SliderValue {
    /// Selection shape the control uses for `mode`.
    ///
    /// Range modes get a range (a single value becomes a one-position range);
    /// every other mode follows the upper handle of a range value.
    #[must_use]
    pub fn to_selection(self, mode: DisplayMode) -> Selection {
        match (self, mode.uses_range()) {
            (Self::Single(p), true) => Selection::range(p, p),
            (Self::Single(p), false) => Selection::Single(p),
            (Self::Range(a, b), true) => Selection::range(a, b),
            (Self::Range(a, b), false) => Selection::Single(a.max(b)),
        }
    }
}

impl From<Selection> for SliderValue {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::Single(p) => Self::Single(p),
            Selection::Range { lo, hi } => Self::Range(lo, hi),
        }
    }
}

/// What the host's slider widget should be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderSpec {
    pub min: usize,
    /// `None` when there is nothing to slide over.
    pub max: Option<usize>,
    pub step: usize,
    /// Two handles instead of one.
    pub range: bool,
    pub initial: SliderValue,
}

/// Emitted once on start and once per slide.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeChanged<I> {
    /// Index positions of the visible items, ascending.
    pub positions: Vec<usize>,
    /// The visible items, in index order.
    pub items: Vec<I>,
}

impl<I> RangeChanged<I> {
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Handle returned by [`Listeners::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<I> = Box<dyn FnMut(&RangeChanged<I>)>;

/// `rangechanged` listener registry. Listeners run in subscription order.
pub struct Listeners<I> {
    next_id: u64,
    entries: Vec<(ListenerId, Listener<I>)>,
}

impl<I> Default for Listeners<I> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<I> std::fmt::Debug for Listeners<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

impl<I> Listeners<I> {
    pub fn subscribe(&mut self, listener: impl FnMut(&RangeChanged<I>) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    pub fn emit(&mut self, event: &RangeChanged<I>) {
        for (_, listener) in &mut self.entries {
            listener(event);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
