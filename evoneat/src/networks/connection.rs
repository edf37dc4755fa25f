use std::fmt;

/// An incoming edge of a network node.
#[derive(Clone, Copy, PartialEq)]
pub(super) struct Connection {
    pub source: usize,
    pub weight: f32,
}

impl Connection {
    /// Creates a new Connection with the specified
    /// source node index and weight.
    pub fn new(source: usize, weight: f32) -> Connection {
        Connection { source, weight }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.9}", self.source, self.weight)
    }
}
