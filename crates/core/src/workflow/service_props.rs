//! Property tests for approval workflow transitions.

use proptest::prelude::*;

use super::service::ApprovalService;
use super::types::ApprovalState;

fn state_strategy() -> impl Strategy<Value = ApprovalState> {
    prop_oneof![
        Just(ApprovalState::NotApplicable),
        Just(ApprovalState::Pending),
        Just(ApprovalState::Approved),
        Just(ApprovalState::Disapproved),
    ]
}

proptest! {
    /// Toggling is idempotent: applying the same target twice lands on
    /// the same state as applying it once.
    #[test]
    fn prop_toggle_idempotent(state in state_strategy(), approve in any::<bool>()) {
        let once = ApprovalService::toggle(state, approve);
        let twice = ApprovalService::toggle(once, approve);
        prop_assert_eq!(once, twice);
    }

    /// After a toggle, the collapsed boolean flag equals the target.
    #[test]
    fn prop_toggle_sets_flag(state in state_strategy(), approve in any::<bool>()) {
        prop_assert_eq!(ApprovalService::toggle(state, approve).is_approved(), approve);
    }

    /// With the workflow disabled, every state is ledger-effective.
    #[test]
    fn prop_disabled_workflow_always_effective(state in state_strategy()) {
        prop_assert!(ApprovalService::is_ledger_effective(state, false));
    }

    /// With the workflow enabled, effectiveness equals the collapsed flag.
    #[test]
    fn prop_enabled_workflow_tracks_flag(state in state_strategy()) {
        prop_assert_eq!(
            ApprovalService::is_ledger_effective(state, true),
            state.is_approved()
        );
    }
}
