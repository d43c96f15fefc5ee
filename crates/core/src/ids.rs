//! Collision-checked id allocation.
//!
//! Ids start from the wall clock in milliseconds so they sort by creation
//! time, but two records created within the same tick would collide. The
//! allocator bumps past the largest id already in the collection instead.

use crate::error::CoreError;
use crate::types::DbId;

/// Pick an id for a new record: `now_ms`, or one past the largest existing
/// id if the clock has not moved beyond it.
///
/// Fails with [`CoreError::IdExhausted`] when the largest existing id is
/// already `DbId::MAX`.
pub fn next_id<I>(now_ms: DbId, existing: I) -> Result<DbId, CoreError>
where
    I: IntoIterator<Item = DbId>,
{
    match existing.into_iter().max() {
        Some(max) if max >= now_ms => max.checked_add(1).ok_or(CoreError::IdExhausted),
        _ => Ok(now_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn empty_collection_uses_clock() {
        assert_eq!(next_id(1_000, Vec::<DbId>::new()).unwrap(), 1_000);
    }

    #[test]
    fn older_ids_do_not_affect_clock_value() {
        assert_eq!(next_id(1_000, [10, 500, 999]).unwrap(), 1_000);
    }

    #[test]
    fn same_tick_bumps_past_existing() {
        assert_eq!(next_id(1_000, [1_000]).unwrap(), 1_001);
    }

    #[test]
    fn clock_behind_existing_ids_still_monotonic() {
        assert_eq!(next_id(900, [1_000, 1_005]).unwrap(), 1_006);
    }

    #[test]
    fn burst_of_allocations_is_unique() {
        let mut ids: Vec<DbId> = Vec::new();
        for _ in 0..50 {
            let id = next_id(5_000, ids.iter().copied()).unwrap();
            ids.push(id);
        }
        let mut sorted = ids.clone();
        sorted.dedup();
        assert_eq!(sorted.len(), 50);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn largest_possible_id_is_an_error_not_a_wrap() {
        assert_matches!(next_id(1_000, [DbId::MAX]), Err(CoreError::IdExhausted));
        assert_eq!(next_id(1_000, [DbId::MAX - 1]).unwrap(), DbId::MAX);
    }
}
