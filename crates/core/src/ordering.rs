//! Dense per-scope position ordering for banners, brands and categories.
//!
//! Every orderable row carries an integer `position`; within one scope
//! (a store, or a store + parent category) the positions are always exactly
//! `0..N-1`. This module plans the single range shift that keeps that
//! invariant when a row is inserted, moved, or deleted. The database layer
//! executes the plan in the same transaction as the triggering write.

/// Shift of a contiguous position range within one scope.
///
/// Every row whose position lies in `from..=to` (or `from..` when `to` is
/// `None`) has `delta` added to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionShift {
    pub from: i32,
    pub to: Option<i32>,
    pub delta: i32,
}

impl PositionShift {
    /// Inclusive upper bound, substituting `i32::MAX` for an open range.
    ///
    /// Lets SQL callers bind a single `BETWEEN`-style predicate.
    pub fn upper_bound(&self) -> i32 {
        self.to.unwrap_or(i32::MAX)
    }

    /// Whether a row at `position` falls inside the shifted range.
    pub fn contains(&self, position: i32) -> bool {
        position >= self.from && position <= self.upper_bound()
    }

    /// The position a row at `position` ends up at after the shift.
    pub fn apply(&self, position: i32) -> i32 {
        if self.contains(position) {
            position + self.delta
        } else {
            position
        }
    }
}

/// Resolve the position a new row is inserted at.
///
/// `existing` is the number of rows already in the scope. An omitted
/// position appends; out-of-range requests are clamped to `0..=existing`.
pub fn insert_position(requested: Option<i32>, existing: i64) -> i32 {
    let end = count_to_i32(existing);
    match requested {
        Some(p) => p.clamp(0, end),
        None => end,
    }
}

/// Resolve the position an existing row is moved to.
///
/// `count` includes the moved row itself, so the valid range is
/// `0..=count-1`.
pub fn move_position(requested: i32, count: i64) -> i32 {
    let last = (count_to_i32(count) - 1).max(0);
    requested.clamp(0, last)
}

/// Rows at or after the insertion point move down one slot.
pub fn plan_insert(position: i32) -> PositionShift {
    PositionShift {
        from: position,
        to: None,
        delta: 1,
    }
}

/// Plan the shift for moving a row from `old` to `new`.
///
/// Returns `None` when the row stays where it is. The moved row itself is
/// never inside the returned range; callers write its new position directly.
pub fn plan_move(old: i32, new: i32) -> Option<PositionShift> {
    if new < old {
        Some(PositionShift {
            from: new,
            to: Some(old - 1),
            delta: 1,
        })
    } else if new > old {
        Some(PositionShift {
            from: old + 1,
            to: Some(new),
            delta: -1,
        })
    } else {
        None
    }
}

/// Rows after a deleted row close the gap.
pub fn plan_delete(deleted: i32) -> PositionShift {
    PositionShift {
        from: deleted + 1,
        to: None,
        delta: -1,
    }
}

fn count_to_i32(count: i64) -> i32 {
    i32::try_from(count.max(0)).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // -- planners --------------------------------------------------------------

    #[test]
    fn insert_shifts_tail() {
        let shift = plan_insert(2);
        assert_eq!(shift.apply(1), 1);
        assert_eq!(shift.apply(2), 3);
        assert_eq!(shift.apply(7), 8);
    }

    #[test]
    fn move_down_shifts_between_target_and_old() {
        let shift = plan_move(4, 1).unwrap();
        assert_eq!(shift, PositionShift { from: 1, to: Some(3), delta: 1 });
        assert_eq!(shift.apply(0), 0);
        assert_eq!(shift.apply(1), 2);
        assert_eq!(shift.apply(3), 4);
        assert_eq!(shift.apply(5), 5);
    }

    #[test]
    fn move_up_shifts_between_old_and_target() {
        let shift = plan_move(1, 4).unwrap();
        assert_eq!(shift, PositionShift { from: 2, to: Some(4), delta: -1 });
        assert_eq!(shift.apply(1), 1);
        assert_eq!(shift.apply(2), 1);
        assert_eq!(shift.apply(4), 3);
        assert_eq!(shift.apply(5), 5);
    }

    #[test]
    fn move_in_place_is_noop() {
        assert!(plan_move(3, 3).is_none());
    }

    #[test]
    fn delete_closes_gap() {
        let shift = plan_delete(2);
        assert_eq!(shift.apply(1), 1);
        assert_eq!(shift.apply(3), 2);
        assert_eq!(shift.upper_bound(), i32::MAX);
    }

    // -- clamping --------------------------------------------------------------

    #[test]
    fn insert_without_position_appends() {
        assert_eq!(insert_position(None, 0), 0);
        assert_eq!(insert_position(None, 5), 5);
    }

    #[test]
    fn insert_position_is_clamped() {
        assert_eq!(insert_position(Some(-3), 5), 0);
        assert_eq!(insert_position(Some(99), 5), 5);
        assert_eq!(insert_position(Some(2), 5), 2);
    }

    #[test]
    fn move_position_is_clamped() {
        assert_eq!(move_position(10, 4), 3);
        assert_eq!(move_position(-1, 4), 0);
        assert_eq!(move_position(0, 1), 0);
    }

    // -- density property ------------------------------------------------------

    /// One mutation against a scope of `len` rows, expressed as raw indices
    /// that are reduced modulo the current size.
    #[derive(Debug, Clone)]
    enum Op {
        Insert(Option<i32>),
        Move(usize, i32),
        Delete(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            proptest::option::of(-2i32..20).prop_map(Op::Insert),
            (0usize..32, -2i32..20).prop_map(|(i, p)| Op::Move(i, p)),
            (0usize..32).prop_map(Op::Delete),
        ]
    }

    /// Apply an op to `rows` (row id -> position) using only the planners,
    /// the same way the repositories do.
    fn apply_op(rows: &mut Vec<(u32, i32)>, next_id: &mut u32, op: &Op) {
        match *op {
            Op::Insert(requested) => {
                let pos = insert_position(requested, rows.len() as i64);
                let shift = plan_insert(pos);
                for row in rows.iter_mut() {
                    row.1 = shift.apply(row.1);
                }
                rows.push((*next_id, pos));
                *next_id += 1;
            }
            Op::Move(idx, requested) => {
                if rows.is_empty() {
                    return;
                }
                let idx = idx % rows.len();
                let old = rows[idx].1;
                let new = move_position(requested, rows.len() as i64);
                if let Some(shift) = plan_move(old, new) {
                    for (i, row) in rows.iter_mut().enumerate() {
                        if i != idx {
                            row.1 = shift.apply(row.1);
                        }
                    }
                }
                rows[idx].1 = new;
            }
            Op::Delete(idx) => {
                if rows.is_empty() {
                    return;
                }
                let idx = idx % rows.len();
                let (_, deleted) = rows.remove(idx);
                let shift = plan_delete(deleted);
                for row in rows.iter_mut() {
                    row.1 = shift.apply(row.1);
                }
            }
        }
    }

    proptest! {
        #[test]
        fn positions_stay_dense(ops in proptest::collection::vec(op_strategy(), 0..60)) {
            let mut rows: Vec<(u32, i32)> = Vec::new();
            let mut next_id = 0;
            for op in &ops {
                apply_op(&mut rows, &mut next_id, op);

                let mut positions: Vec<i32> = rows.iter().map(|r| r.1).collect();
                positions.sort_unstable();
                let expected: Vec<i32> = (0..rows.len() as i32).collect();
                prop_assert_eq!(positions, expected);
            }
        }

        #[test]
        fn move_lands_on_requested_slot(len in 1usize..20, from in 0usize..20, to in 0i32..20) {
            let mut rows: Vec<(u32, i32)> = (0..len as u32).map(|i| (i, i as i32)).collect();
            let mut next_id = len as u32;
            let from = from % len;
            apply_op(&mut rows, &mut next_id, &Op::Move(from, to));
            prop_assert_eq!(rows[from].1, move_position(to, len as i64));
        }
    }
}
