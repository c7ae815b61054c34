//! Property-based tests for teardown and session naming.
//!
//! Uses `proptest` to verify invariants across every combination of
//! acquired resources.

#![allow(clippy::expect_used)]

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use ssm_shell::application::services::cleanup::{CleanupCoordinator, CleanupStep, TeardownGuard};
use ssm_shell::domain::{Activation, EndReason, ServicePlacement, SessionConfig, SessionIdentity, SessionPhase, SessionState};

use crate::mocks::{FakeAccount, RecordingReporter};

fn state_with(placement: bool, activation: bool, task: bool, instance: bool) -> SessionState {
    let mut state = SessionState::new();
    if placement {
        state.record_placement(ServicePlacement {
            task_definition: "api:7".into(),
            container_name: "app".into(),
            security_groups: ["sg-1".to_string()].into(),
            subnets: ["subnet-a".to_string()].into(),
        });
    }
    if activation {
        state.record_activation(Activation {
            id: "act-1".into(),
            code: "code".into(),
        });
    }
    if task {
        state.record_task("arn:task/1");
    }
    if instance {
        state.record_instance("mi-1");
    }
    state
}

fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("runtime")
        .block_on(fut)
}

// ============================================================================
// Teardown is exactly the acquired subset, in fixed order
// ============================================================================

proptest! {
    #[test]
    fn prop_teardown_releases_exactly_what_was_acquired(
        placement in any::<bool>(),
        activation in any::<bool>(),
        task in any::<bool>(),
        instance in any::<bool>(),
    ) {
        let account = FakeAccount::default();
        let reporter = RecordingReporter::default();
        let mut state = state_with(placement, activation, task, instance);

        let report = block_on(
            CleanupCoordinator::new(&account, &account, &reporter, TeardownGuard::new())
                .run("prod", &mut state, &EndReason::Exited),
        );

        let expected: Vec<CleanupStep> = [
            (task, CleanupStep::StopTask),
            (activation, CleanupStep::DeleteActivation),
            (instance, CleanupStep::DeregisterInstance),
        ]
        .into_iter()
        .filter_map(|(present, step)| present.then_some(step))
        .collect();
        prop_assert_eq!(report.steps(), expected.clone());
        prop_assert_eq!(account.teardown().len(), expected.len());
        prop_assert!(report.all_succeeded());
        prop_assert_eq!(state.phase(), SessionPhase::Terminated);
        prop_assert_eq!(state.task_arn(), None);
        prop_assert_eq!(state.instance_id(), None);
    }

    /// Running teardown again, even under a fresh guard, finds nothing to do.
    #[test]
    fn prop_teardown_is_idempotent(
        activation in any::<bool>(),
        task in any::<bool>(),
        instance in any::<bool>(),
    ) {
        let account = FakeAccount::default();
        let reporter = RecordingReporter::default();
        let mut state = state_with(true, activation, task, instance);

        block_on(async {
            CleanupCoordinator::new(&account, &account, &reporter, TeardownGuard::new())
                .run("prod", &mut state, &EndReason::Exited)
                .await;
        });
        let calls = account.teardown().len();
        let again = block_on(
            CleanupCoordinator::new(&account, &account, &reporter, TeardownGuard::new())
                .run("prod", &mut state, &EndReason::Exited),
        );

        prop_assert!(again.actions.is_empty());
        prop_assert_eq!(account.teardown().len(), calls);
    }

    /// Identity is `<cluster>-<service>-<unix seconds>` for any inputs.
    #[test]
    fn prop_identity_format(
        cluster in "[a-z0-9-]{1,20}",
        service in "[a-z0-9-]{1,20}",
        secs in 0i64..4_000_000_000,
    ) {
        let config = SessionConfig {
            cluster: cluster.clone(),
            service: service.clone(),
            iam_role: "role".into(),
        };
        let at = Utc.timestamp_opt(secs, 0).single().expect("ts");
        let identity = SessionIdentity::new(&config, at);
        prop_assert_eq!(identity.as_str(), format!("{cluster}-{service}-{secs}"));
    }
}

#[test]
fn teardown_against_already_released_resources_records_errors_without_panicking() {
    let account = FakeAccount {
        teardown_fails: true,
        ..FakeAccount::default()
    };
    let reporter = RecordingReporter::default();
    let mut state = state_with(true, true, true, true);

    let report = block_on(
        CleanupCoordinator::new(&account, &account, &reporter, TeardownGuard::new())
            .run("prod", &mut state, &EndReason::Interrupted),
    );

    assert_eq!(report.actions.len(), 3);
    assert!(report.actions.iter().all(|a| a.error.is_some()));
    assert_eq!(state.phase(), SessionPhase::Terminated);
}
