//! Paths for locating a node inside a value tree.

use core::fmt;

/// One step from a parent node to a child node
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PathSegment {
    /// A named record field
    Field(&'static str),
    /// A position inside a sequence
    Index(usize),
}

/// The location of a node, from the root of the value tree down
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Creates the path of the root node
    pub fn root() -> Self {
        Path::default()
    }

    /// Segments from the root down
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns `true` if this path points at the root
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if this path has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Path { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
