/// A bounded table of the distinct colours of a tile, in the order they were
/// first seen.
///
/// Lookups are linear; tables never hold more than 128 colours.
#[derive(Debug, Clone)]
pub struct Palette<P> {
    capacity: usize,
    values: Vec<P>,
    overflowed: bool,
}

impl<P> Palette<P>
where
    P: Copy + PartialEq,
{
    pub fn new(capacity: usize) -> Palette<P> {
        Palette {
            capacity,
            values: Vec::with_capacity(capacity),
            overflowed: false,
        }
    }

    /// Registers a value. Returns false if the value could not be recorded
    /// because the table is full, in which case the table is marked as overflowed.
    pub fn put(&mut self, value: P) -> bool {
        if self.overflowed {
            return false;
        }
        if self.values.contains(&value) {
            return true;
        }
        if self.values.len() == self.capacity {
            self.overflowed = true;
            return false;
        }
        self.values.push(value);
        true
    }

    /// Returns the index of a recorded value.
    pub fn index_of(&self, value: P) -> Option<usize> {
        self.values.iter().position(|&v| v == value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The recorded values in insertion order.
    pub fn values(&self) -> &[P] {
        &self.values
    }

    /// Empties the table so it can be reused for the next tile.
    pub fn clear(&mut self) {
        self.values.clear();
        self.overflowed = false;
    }
}
