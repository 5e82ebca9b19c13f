use banker_rust::{Allocator, AllocatorError, DenialReason, RequestOutcome, SystemConfig};

fn classic_config() -> SystemConfig {
    SystemConfig::from_parts(
        vec![3, 3, 2],
        vec![
            vec![7, 5, 3],
            vec![3, 2, 2],
            vec![9, 0, 2],
            vec![2, 2, 2],
            vec![4, 3, 3],
        ],
    )
}

fn classic_allocation() -> Vec<Vec<u32>> {
    vec![
        vec![0, 1, 0],
        vec![2, 0, 0],
        vec![3, 0, 2],
        vec![2, 1, 1],
        vec![0, 0, 2],
    ]
}

#[test]
fn classic_five_by_three_grant() {
    let mut allocator = Allocator::with_allocation(&classic_config(), &classic_allocation()).unwrap();
    assert_eq!(
        allocator.snapshot().need,
        vec![
            vec![7, 4, 3],
            vec![1, 2, 2],
            vec![6, 0, 0],
            vec![0, 1, 1],
            vec![4, 3, 1],
        ]
    );

    let outcome = allocator.try_safe_request(1, 0).unwrap();
    let safe_sequence = match outcome {
        RequestOutcome::Granted { safe_sequence } => safe_sequence,
        other => panic!("expected grant, got {:?}", other),
    };

    let mut sorted = safe_sequence.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
    assert_eq!(safe_sequence, vec![1, 3, 0, 2, 4]);

    let snapshot = allocator.snapshot();
    assert_eq!(snapshot.available, vec![2, 3, 2]);
    assert_eq!(snapshot.allocation[1], vec![3, 0, 0]);
    assert_eq!(snapshot.need[1], vec![0, 2, 2]);
}

#[test]
fn classic_unsafe_request_rolls_back() {
    let mut allocator = Allocator::with_allocation(&classic_config(), &classic_allocation()).unwrap();
    // P0 keeps taking R1 until the pool can no longer carry everyone
    let mut denied = None;
    for _ in 0..3 {
        let before = allocator.snapshot();
        match allocator.try_safe_request(0, 1).unwrap() {
            RequestOutcome::Granted { .. } => assert!(allocator.is_safe()),
            RequestOutcome::Denied(reason) => {
                assert_eq!(allocator.snapshot(), before);
                denied = Some(reason);
                break;
            }
        }
    }
    assert_eq!(denied, Some(DenialReason::UnsafeState));
}

#[test]
fn exhausted_resource_is_unavailable() {
    let config = SystemConfig::from_parts(vec![1, 0], vec![vec![1, 1], vec![1, 1]]);
    let mut allocator = Allocator::new(&config).unwrap();
    let before = allocator.snapshot();

    for process in 0..2 {
        assert_eq!(
            allocator.try_safe_request(process, 1).unwrap(),
            RequestOutcome::Denied(DenialReason::ResourceUnavailable)
        );
    }
    assert_eq!(allocator.snapshot(), before);
}

#[test]
fn allocation_equal_to_max_completes() {
    let config = SystemConfig::from_parts(vec![1, 1], vec![vec![2, 1], vec![1, 1]]);
    let mut allocator = Allocator::with_allocation(&config, &[vec![2, 1], vec![0, 0]]).unwrap();

    assert!(allocator.check_completion(0).unwrap());
    assert_eq!(allocator.available(), &[3, 2]);
    assert!(allocator.snapshot().finish[0]);

    // Second call releases nothing
    assert!(allocator.check_completion(0).unwrap());
    assert_eq!(allocator.available(), &[3, 2]);
}

#[test]
fn single_process_takes_everything() {
    for k in 1..=6u32 {
        let config = SystemConfig::from_parts(vec![k], vec![vec![k]]);
        let mut allocator = Allocator::new(&config).unwrap();

        for granted in 1..=k {
            assert!(!allocator.check_completion(0).unwrap());
            assert!(allocator.try_safe_request(0, 0).unwrap().is_granted());
            assert_eq!(allocator.allocation(0), &[granted]);
        }
        assert!(allocator.check_completion(0).unwrap());
        assert!(allocator.is_complete());
        assert_eq!(allocator.available(), &[k]);
    }
}

#[test]
fn caller_bugs_fail_loudly() {
    let mut allocator = Allocator::with_allocation(&classic_config(), &classic_allocation()).unwrap();
    let before = allocator.snapshot();

    assert!(matches!(
        allocator.try_safe_request(9, 0),
        Err(AllocatorError::ProcessOutOfRange { .. })
    ));
    assert!(matches!(
        allocator.try_safe_request(0, 9),
        Err(AllocatorError::ResourceOutOfRange { .. })
    ));
    assert!(matches!(
        allocator.try_safe_request(3, 0),
        Err(AllocatorError::ResourceNotNeeded {
            process: 3,
            resource: 0
        })
    ));
    assert_eq!(allocator.snapshot(), before);
}
