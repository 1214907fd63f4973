//! Board Collision Resolver
//!
//! Picks the single droppable the dragged entity is over.
//! Columns reorder by nearest center. Tasks prefer pointer containment,
//! then rectangle overlap, then nearest center.

use leptos_dragdrop::{closest_center, pointer_within, rect_intersection, GeometrySource};

use crate::models::DragKind;

pub fn resolve_collision<G: GeometrySource>(active: Option<DragKind>, geometry: &G) -> Option<G::Id> {
    match active? {
        DragKind::Column => closest_center(geometry).into_iter().next().map(|c| c.id),
        DragKind::Task => resolve_task(geometry),
    }
}

fn resolve_task<G: GeometrySource>(geometry: &G) -> Option<G::Id> {
    let within = pointer_within(geometry);
    if let (Some(pointer), false) = (geometry.pointer(), within.is_empty()) {
        // Rank by squared distance from the pointer to each candidate's live center.
        // Candidates without a rectangle rank last but are not dropped.
        let mut best: Option<(G::Id, f64)> = None;
        for collision in within {
            let distance = geometry
                .translated_rect(&collision.id)
                .or_else(|| geometry.rect(&collision.id))
                .map(|r| r.center().distance_sq(pointer))
                .unwrap_or(f64::INFINITY);
            if best.as_ref().map_or(true, |(_, d)| distance < *d) {
                best = Some((collision.id, distance));
            }
        }
        return best.map(|(id, _)| id);
    }

    if let Some(first) = rect_intersection(geometry).into_iter().next() {
        return Some(first.id);
    }

    closest_center(geometry).into_iter().next().map(|c| c.id)
}
