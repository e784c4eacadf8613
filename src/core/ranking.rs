//! Ranking and gap computation over the finish times of one event.
//!
//! Records are kept ordered by `(elapsed_ms, id)`: equal times rank the
//! earlier inserted record first. Ranks are always `1..=N`.
//!
//! Gaps:
//! - to leader: `elapsed - min(elapsed)`
//! - to previous: `elapsed - max { e | e < elapsed }`, or 0 when nothing
//!   is strictly faster. Tied records share both gaps.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gaps {
    pub leader_ms: i64,
    pub previous_ms: i64,
}

/// Rank and gaps of one record, as derived from the whole event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub record_id: i64,
    pub elapsed_ms: i64,
    pub rank: i64,
    pub gaps: Gaps,
}

#[derive(Debug, Clone, Default)]
pub struct Standings {
    entries: BTreeSet<(i64, i64)>,
}

impl Standings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(record_id, elapsed_ms)` pairs.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(id, elapsed)| (elapsed, id))
                .collect(),
        }
    }

    pub fn insert(&mut self, record_id: i64, elapsed_ms: i64) -> bool {
        self.entries.insert((elapsed_ms, record_id))
    }

    pub fn remove(&mut self, record_id: i64, elapsed_ms: i64) -> bool {
        self.entries.remove(&(elapsed_ms, record_id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best time of the event.
    pub fn leader_ms(&self) -> Option<i64> {
        self.entries.first().map(|(elapsed, _)| *elapsed)
    }

    /// Largest time strictly smaller than `elapsed_ms`.
    pub fn predecessor_ms(&self, elapsed_ms: i64) -> Option<i64> {
        self.entries
            .range(..(elapsed_ms, i64::MIN))
            .next_back()
            .map(|(elapsed, _)| *elapsed)
    }

    /// Gaps of a time against the current set. The time itself need not
    /// be in the set; a new best time has zero gaps.
    pub fn gaps_for(&self, elapsed_ms: i64) -> Gaps {
        let leader = self
            .leader_ms()
            .map_or(elapsed_ms, |best| best.min(elapsed_ms));

        Gaps {
            leader_ms: elapsed_ms - leader,
            previous_ms: self
                .predecessor_ms(elapsed_ms)
                .map_or(0, |prev| elapsed_ms - prev),
        }
    }

    /// Every record in classification order with its rank and gaps.
    pub fn placements(&self) -> Vec<Placement> {
        let Some(leader) = self.leader_ms() else {
            return Vec::new();
        };

        let mut out = Vec::with_capacity(self.entries.len());
        // current distinct time, and the distinct time before it
        let mut current: Option<i64> = None;
        let mut previous: Option<i64> = None;

        for (idx, &(elapsed, id)) in self.entries.iter().enumerate() {
            if current != Some(elapsed) {
                previous = current;
                current = Some(elapsed);
            }

            out.push(Placement {
                record_id: id,
                elapsed_ms: elapsed,
                rank: idx as i64 + 1,
                gaps: Gaps {
                    leader_ms: elapsed - leader,
                    previous_ms: previous.map_or(0, |p| elapsed - p),
                },
            });
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn three_finishers_one_minute_apart() {
        let s = Standings::from_entries([(1, 7_200_000), (2, 7_260_000), (3, 7_320_000)]);
        let p = s.placements();

        assert_eq!(p.iter().map(|x| x.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(p[0].gaps, Gaps::default());
        assert_eq!(
            p[1].gaps,
            Gaps {
                leader_ms: 60_000,
                previous_ms: 60_000
            }
        );
        assert_eq!(
            p[2].gaps,
            Gaps {
                leader_ms: 120_000,
                previous_ms: 60_000
            }
        );
    }

    #[test]
    fn ties_break_by_record_id_and_share_gaps() {
        let s = Standings::from_entries([(7, 1_000), (3, 2_000), (5, 2_000), (9, 3_000)]);
        let p = s.placements();

        assert_eq!(
            p.iter().map(|x| x.record_id).collect::<Vec<_>>(),
            vec![7, 3, 5, 9]
        );
        assert_eq!(p[1].gaps, p[2].gaps);
        assert_eq!(p[1].gaps.previous_ms, 1_000);
        // the record after a tie measures against the tied time
        assert_eq!(p[3].gaps.previous_ms, 1_000);
    }

    #[test]
    fn new_leader_has_zero_gaps() {
        let s = Standings::from_entries([(1, 5_000), (2, 6_000)]);
        assert_eq!(s.gaps_for(4_000), Gaps::default());
        assert_eq!(
            s.gaps_for(5_500),
            Gaps {
                leader_ms: 500,
                previous_ms: 500
            }
        );
    }

    #[test]
    fn removing_the_leader_promotes_the_next() {
        let mut s = Standings::from_entries([(1, 5_000), (2, 6_000), (3, 6_500)]);
        assert!(s.remove(1, 5_000));
        assert!(!s.remove(1, 5_000));

        let p = s.placements();
        assert_eq!(p[0].record_id, 2);
        assert_eq!(p[0].rank, 1);
        assert_eq!(p[1].gaps.leader_ms, 500);
    }

    #[test]
    fn empty_standings() {
        let s = Standings::new();
        assert!(s.is_empty());
        assert!(s.placements().is_empty());
        assert_eq!(s.gaps_for(42), Gaps::default());
    }

    proptest! {
        #[test]
        fn placements_hold_ranking_invariants(times in prop::collection::vec(0i64..50_000, 0..60)) {
            let s = Standings::from_entries(times.iter().enumerate().map(|(i, t)| (i as i64 + 1, *t)));
            let p = s.placements();
            prop_assert_eq!(p.len(), times.len());

            let min = times.iter().copied().min();
            for (idx, pl) in p.iter().enumerate() {
                prop_assert_eq!(pl.rank, idx as i64 + 1);
                prop_assert_eq!(pl.gaps.leader_ms, pl.elapsed_ms - min.unwrap_or(0));

                let expected_prev = times
                    .iter()
                    .copied()
                    .filter(|t| *t < pl.elapsed_ms)
                    .max()
                    .map_or(0, |t| pl.elapsed_ms - t);
                prop_assert_eq!(pl.gaps.previous_ms, expected_prev);
                prop_assert_eq!(s.gaps_for(pl.elapsed_ms), pl.gaps);
            }

            if let Some(first) = p.first() {
                prop_assert_eq!(Some(first.elapsed_ms), min);
                prop_assert_eq!(first.gaps, Gaps::default());
            }
        }
    }
}
