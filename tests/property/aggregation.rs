use proptest::prelude::*;
use stepwise::results::StatusCounts;
use stepwise::types::ExecutionStatus;

fn status_strategy() -> impl Strategy<Value = ExecutionStatus> {
    prop_oneof![
        Just(ExecutionStatus::NotRun),
        Just(ExecutionStatus::Passed),
        Just(ExecutionStatus::Bypassed),
        Just(ExecutionStatus::Ignored),
        Just(ExecutionStatus::Failed),
    ]
}

proptest! {
    #[test]
    fn aggregate_is_the_most_severe_member(statuses in proptest::collection::vec(status_strategy(), 0..32)) {
        let aggregate = ExecutionStatus::aggregate(statuses.iter().copied());

        if statuses.is_empty() {
            prop_assert_eq!(aggregate, ExecutionStatus::NotRun);
        } else {
            prop_assert!(statuses.contains(&aggregate));
            prop_assert!(statuses.iter().all(|s| s.severity() <= aggregate.severity()));
        }
    }

    #[test]
    fn aggregation_ignores_order_and_grouping(
        left in proptest::collection::vec(status_strategy(), 0..16),
        right in proptest::collection::vec(status_strategy(), 0..16),
    ) {
        let whole = ExecutionStatus::aggregate(left.iter().chain(right.iter()).copied());
        let reversed = ExecutionStatus::aggregate(right.iter().chain(left.iter()).copied());
        let nested = ExecutionStatus::aggregate([
            ExecutionStatus::aggregate(left.iter().copied()),
            ExecutionStatus::aggregate(right.iter().copied()),
        ]);

        prop_assert_eq!(whole, reversed);
        prop_assert_eq!(whole, nested);
    }

    #[test]
    fn counts_partition_the_input(statuses in proptest::collection::vec(status_strategy(), 0..64)) {
        let counts = StatusCounts::from_statuses(statuses.iter().copied());
        prop_assert_eq!(counts.total(), statuses.len());

        let failed = statuses.iter().filter(|s| **s == ExecutionStatus::Failed).count();
        prop_assert_eq!(counts.failed, failed);
    }
}
