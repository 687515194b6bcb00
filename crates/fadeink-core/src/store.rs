//! Insertion-ordered store of sealed strokes.

use crate::stroke::{Stroke, StrokeId};

/// Ordered collection of live strokes.
///
/// Iteration order is insertion order. Lookup and removal go through the
/// stroke's identity, never its point data, so two strokes with identical
/// points are still distinct entries.
#[derive(Debug, Clone, Default)]
pub struct StrokeStore {
    strokes: Vec<Stroke>,
}

impl StrokeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stroke. Empty strokes are discarded; returns whether it was stored.
    pub fn push(&mut self, stroke: Stroke) -> bool {
        if stroke.is_empty() {
            return false;
        }
        self.strokes.push(stroke);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }

    pub fn get(&self, id: StrokeId) -> Option<&Stroke> {
        self.strokes.iter().find(|s| s.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: StrokeId) -> Option<&mut Stroke> {
        self.strokes.iter_mut().find(|s| s.id == id)
    }

    pub fn contains(&self, id: StrokeId) -> bool {
        self.get(id).is_some()
    }

    /// Remove a stroke by identity.
    ///
    /// The index is looked up at removal time, so interleaved removals of
    /// other strokes never shift this one out from under us.
    pub fn remove(&mut self, id: StrokeId) -> Option<Stroke> {
        let index = self.strokes.iter().position(|s| s.id == id)?;
        Some(self.strokes.remove(index))
    }

    /// Remove every stroke, returning their ids in insertion order.
    pub fn clear(&mut self) -> Vec<StrokeId> {
        self.strokes.drain(..).map(|s| s.id).collect()
    }

    pub fn ids(&self) -> Vec<StrokeId> {
        self.strokes.iter().map(|s| s.id).collect()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}
