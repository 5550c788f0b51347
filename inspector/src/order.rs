//! Ordering of discovered members.
//!
//! Members carry the source line of their first annotation as an ordering
//! hint. Members without one get a hint interpolated from their neighbors
//! of the same kind, so an unannotated field stays next to the annotated
//! fields it was declared between.

use crate::reflect::MemberKind;

/// Something with a member kind and an ordering hint (`< 0` when missing).
pub trait Ordered {
    fn kind(&self) -> MemberKind;
    fn order_hint(&self) -> f64;
    fn set_order_hint(&mut self, hint: f64);
}

/// Fills missing hints, then stable-sorts by hint.
///
/// A missing hint becomes the midpoint between the previous member's hint
/// (reset at every change of member kind) and the next hinted member of the
/// same kind, scanning forward only while the kind stays the same. With a
/// single neighbor the hint is one past it on the missing side. Without
/// either neighbor the fallback is `kind.ordinal() * 10`.
pub fn resolve_order<T: Ordered>(items: &mut [T]) {
    let mut last_kind: Option<MemberKind> = None;
    let mut min_value = -1.0;

    for idx in 0..items.len() {
        let kind = items[idx].kind();
        if items[idx].order_hint() < 0.0 {
            if last_kind != Some(kind) {
                min_value = -1.0;
            }

            let mut max_value = -1.0;
            for next in &items[idx + 1..] {
                if next.kind() != kind {
                    break;
                }
                if next.order_hint() >= 0.0 {
                    max_value = next.order_hint();
                    break;
                }
            }

            let hint = match (min_value >= 0.0, max_value >= 0.0) {
                (true, true) => (min_value + max_value) / 2.0,
                (true, false) => min_value + 1.0,
                (false, true) => max_value - 1.0,
                (false, false) => kind.ordinal() as f64 * 10.0,
            };
            items[idx].set_order_hint(hint);
        }

        last_kind = Some(kind);
        min_value = items[idx].order_hint();
    }

    items.sort_by(|a, b| a.order_hint().total_cmp(&b.order_hint()));
}
