use core_types::Bar;

/// A position into one instrument's owned, finite bar sequence.
///
/// It only moves forward, one bar per call, and reports exhaustion instead of
/// signalling it through control flow.
#[derive(Debug, Clone)]
pub struct Cursor {
    bars: Vec<Bar>,
    position: usize,
}

impl Cursor {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars, position: 0 }
    }

    pub fn peek(&self) -> Option<&Bar> {
        self.bars.get(self.position)
    }

    /// Returns the next bar and moves past it.
    pub fn next_bar(&mut self) -> Option<Bar> {
        let bar = self.bars.get(self.position).cloned()?;
        self.position += 1;
        Some(bar)
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.bars.len()
    }

    pub fn remaining(&self) -> usize {
        self.bars.len().saturating_sub(self.position)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
