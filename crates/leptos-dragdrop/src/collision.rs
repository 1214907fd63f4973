//! Collision Primitives
//!
//! Building blocks for deciding which droppable the dragged element is over.
//! All of them read geometry through [`GeometrySource`], so they never touch
//! the DOM and can be exercised with plain rectangles.

use crate::geometry::{Point, Rect};

/// Supplies droppable rectangles and pointer state for one hit test
pub trait GeometrySource {
    type Id: Clone + PartialEq;

    /// Droppable ids in document order
    fn droppable_ids(&self) -> Vec<Self::Id>;

    /// Static rectangle of a droppable, if it can be measured
    fn rect(&self, id: &Self::Id) -> Option<Rect>;

    /// Live rectangle of a droppable that is currently being moved
    fn translated_rect(&self, _id: &Self::Id) -> Option<Rect> {
        None
    }

    fn pointer(&self) -> Option<Point>;

    /// Rectangle of the dragged element at its current (translated) position
    fn active_rect(&self) -> Option<Rect>;
}

/// A candidate droppable with the score that ranked it
#[derive(Clone, Debug, PartialEq)]
pub struct Collision<Id> {
    pub id: Id,
    pub value: f64,
}

fn sort_ascending<Id>(collisions: &mut [Collision<Id>]) {
    collisions.sort_by(|a, b| a.value.total_cmp(&b.value));
}

/// Droppables ordered by distance between their center and the dragged
/// element's center (or the pointer when the element cannot be measured).
pub fn closest_center<G: GeometrySource>(geometry: &G) -> Vec<Collision<G::Id>> {
    let reference = match geometry.active_rect().map(|r| r.center()).or(geometry.pointer()) {
        Some(point) => point,
        None => return Vec::new(),
    };
    let mut collisions: Vec<_> = geometry
        .droppable_ids()
        .into_iter()
        .filter_map(|id| {
            let rect = geometry.rect(&id)?;
            let value = rect.center().distance(reference);
            Some(Collision { id, value })
        })
        .collect();
    sort_ascending(&mut collisions);
    collisions
}

/// Droppables whose rectangle contains the pointer, nearest corners first
pub fn pointer_within<G: GeometrySource>(geometry: &G) -> Vec<Collision<G::Id>> {
    let pointer = match geometry.pointer() {
        Some(point) => point,
        None => return Vec::new(),
    };
    let mut collisions: Vec<_> = geometry
        .droppable_ids()
        .into_iter()
        .filter_map(|id| {
            let rect = geometry.rect(&id)?;
            if !rect.contains(pointer) {
                return None;
            }
            let corners = [
                Point::new(rect.left, rect.top),
                Point::new(rect.right(), rect.top),
                Point::new(rect.left, rect.bottom()),
                Point::new(rect.right(), rect.bottom()),
            ];
            let value = corners.iter().map(|c| c.distance(pointer)).sum::<f64>() / 4.0;
            Some(Collision { id, value })
        })
        .collect();
    sort_ascending(&mut collisions);
    collisions
}

/// Droppables overlapping the dragged element, largest overlap ratio first
pub fn rect_intersection<G: GeometrySource>(geometry: &G) -> Vec<Collision<G::Id>> {
    let active = match geometry.active_rect() {
        Some(rect) => rect,
        None => return Vec::new(),
    };
    let mut collisions: Vec<_> = geometry
        .droppable_ids()
        .into_iter()
        .filter_map(|id| {
            let rect = geometry.rect(&id)?;
            let value = rect.intersection_ratio(&active);
            (value > 0.0).then_some(Collision { id, value })
        })
        .collect();
    collisions.sort_by(|a, b| b.value.total_cmp(&a.value));
    collisions
}
