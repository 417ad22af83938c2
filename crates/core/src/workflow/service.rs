//! Approval state transitions and ledger-effectiveness.

use super::types::ApprovalState;

/// Stateless service for approval workflow transitions.
///
/// The workflow-enabled flag is always an explicit argument, never ambient
/// state, so behavior can vary per call.
pub struct ApprovalService;

impl ApprovalService {
    /// Determines the approval state of a newly created operation.
    ///
    /// With the workflow disabled every operation is `NotApplicable`
    /// (immediately ledger-effective). With it enabled, the caller may
    /// explicitly mark the operation approved; otherwise it starts
    /// `Pending`.
    #[must_use]
    pub fn on_create(workflow_enabled: bool, explicitly_approved: bool) -> ApprovalState {
        if !workflow_enabled {
            ApprovalState::NotApplicable
        } else if explicitly_approved {
            ApprovalState::Approved
        } else {
            ApprovalState::Pending
        }
    }

    /// Toggles an operation's approval flag.
    ///
    /// Any-direction toggle: `Pending`, `Approved`, `Disapproved`, and
    /// `NotApplicable` all move directly to the target state.
    #[must_use]
    pub fn toggle(_current: ApprovalState, approve: bool) -> ApprovalState {
        if approve {
            ApprovalState::Approved
        } else {
            ApprovalState::Disapproved
        }
    }

    /// Pure ledger-effectiveness check.
    ///
    /// An operation contributes to its account balance when the workflow
    /// is disabled, or when it is enabled and the stored flag collapses
    /// to approved. Toggling the global setting never rewrites stored
    /// flags; it only changes whether this evaluation consults them.
    #[must_use]
    pub fn is_ledger_effective(state: ApprovalState, workflow_enabled: bool) -> bool {
        !workflow_enabled || state.is_approved()
    }
}
