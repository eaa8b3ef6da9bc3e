use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

use steward_nullables::{NullClock, NullPrompt, RecordingNotifier};
use steward_types::{GroupId, VoterId};
use steward_voting::{
    display_percent, pass_threshold, BallotResult, VoteManager, VoteOutcome, VoteRequest,
    VoteScope, VoterRegistry, VotingParams,
};

fn manager_with(voters: usize) -> VoteManager {
    let registry = Arc::new(VoterRegistry::new());
    registry.join(VoterId::new("creator"), Some(GroupId::new(1)));
    for i in 0..voters {
        registry.join(VoterId::new(format!("v{i}")), Some(GroupId::new(1)));
    }
    VoteManager::new(
        VotingParams::default(),
        registry,
        Arc::new(NullClock::new(0)),
        Arc::new(NullPrompt::new()),
        Arc::new(RecordingNotifier::new()),
    )
}

proptest! {
    /// Above two voters the threshold is ceil(ratio * (total + 1)).
    #[test]
    fn threshold_matches_ceiling_formula(total in 3usize..10_000, bps in 1u32..=10_000) {
        let t = pass_threshold(total, bps) as u64;
        let scaled = u64::from(bps) * (total as u64 + 1);
        prop_assert!(t * 10_000 >= scaled);
        prop_assert!((t - 1) * 10_000 < scaled);
    }

    /// Electorates of two or fewer always need every vote.
    #[test]
    fn tiny_electorates_need_unanimity(total in 0usize..=2, bps in 0u32..=10_000) {
        prop_assert_eq!(pass_threshold(total, bps), total);
    }

    /// A stricter ratio never lowers the threshold.
    #[test]
    fn threshold_is_monotonic_in_ratio(total in 0usize..1000, a in 0u32..=10_000, b in 0u32..=10_000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(pass_threshold(total, lo) <= pass_threshold(total, hi));
    }

    /// Display percent stays within 0..=100 and is exact at the ends.
    #[test]
    fn percent_is_bounded(total in 1usize..10_000, ok_frac in 0.0f64..=1.0) {
        let ok = ((total as f64) * ok_frac) as usize;
        let pct = display_percent(ok, total);
        prop_assert!(pct <= 100);
        prop_assert_eq!(display_percent(0, total), 0);
        prop_assert_eq!(display_percent(total, total), 100);
    }

    /// Any sequence of ballots, duplicates included, records each voter at most once.
    #[test]
    fn repeated_ballots_count_once(voters in 2usize..20, picks in prop::collection::vec(0usize..25, 0..60)) {
        let manager = manager_with(voters);
        manager
            .create_vote(VoteRequest::new(VoteScope::Global, VoterId::new("creator"), "map"), |_: &VoteOutcome| {})
            .unwrap();

        let mut expected = BTreeSet::new();
        for p in picks {
            let id = VoterId::new(format!("v{p}"));
            let result = manager.add_vote(&id);
            if p >= voters {
                prop_assert_eq!(result, BallotResult::NotEligible);
            } else if expected.insert(id) {
                prop_assert_eq!(result, BallotResult::Accepted);
            } else {
                prop_assert_eq!(result, BallotResult::Duplicate);
            }
        }
        let snapshot = manager.snapshot(VoteScope::Global).unwrap();
        prop_assert!(snapshot.ballots.is_subset(&snapshot.eligible));
        prop_assert_eq!(snapshot.ballots, expected);
    }

    /// The creator is never part of the electorate, whatever the predicate.
    #[test]
    fn creator_never_eligible(voters in 1usize..20, group in any::<bool>()) {
        let manager = manager_with(voters);
        let scope = if group { VoteScope::Group(GroupId::new(1)) } else { VoteScope::Global };
        manager
            .create_vote(VoteRequest::new(scope, VoterId::new("creator"), "t"), |_: &VoteOutcome| {})
            .unwrap();
        let snapshot = manager.snapshot(scope).unwrap();
        prop_assert!(!snapshot.eligible.contains(&VoterId::new("creator")));
        prop_assert_eq!(snapshot.eligible.len(), voters);
    }
}
