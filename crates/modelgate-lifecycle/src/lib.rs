//! ModelGate Lifecycle - the version promotion state machine
//!
//! The lifecycle is a fixed directed graph over `VersionState`:
//!
//! ```text
//! draft -> submitted -> approved_staging -> staging -> approved_prod
//!            |  ^                             |            |
//!            v  |                             v            v
//!     changes_requested <---------------------+       production
//!                                                          |
//!                                                          v
//!                                              deprecated -> retired
//! ```
//!
//! `submitted` can be sent back to `changes_requested` by review, and
//! `staging` can be sent back when staging results demand another
//! review round. `retired` is terminal.
//!
//! The table is the first check on every promotion request: an edge not
//! listed here is rejected before any policy or approval work runs.
#![deny(unsafe_code)]

use modelgate_types::VersionState;

/// Legal target states from a given state. Exhaustive by construction;
/// adding a `VersionState` variant forces an update here.
pub fn allowed_targets(state: VersionState) -> &'static [VersionState] {
    match state {
        VersionState::Draft => &[VersionState::Submitted],
        VersionState::Submitted => &[
            VersionState::ChangesRequested,
            VersionState::ApprovedStaging,
        ],
        VersionState::ChangesRequested => &[VersionState::Submitted],
        VersionState::ApprovedStaging => &[VersionState::Staging],
        VersionState::Staging => &[
            VersionState::ApprovedProd,
            VersionState::ChangesRequested,
        ],
        VersionState::ApprovedProd => &[VersionState::Production],
        VersionState::Production => &[VersionState::Deprecated],
        VersionState::Deprecated => &[VersionState::Retired],
        VersionState::Retired => &[],
    }
}

/// Whether `current -> target` is an edge of the lifecycle graph.
/// Total over all state pairs.
pub fn validate_transition(current: VersionState, target: VersionState) -> bool {
    allowed_targets(current).contains(&target)
}

/// Whether a valid edge moves the version toward production, as
/// opposed to a review pushback or the retirement path.
pub fn is_promotion(current: VersionState, target: VersionState) -> bool {
    matches!(
        (current, target),
        (VersionState::Draft, VersionState::Submitted)
            | (VersionState::ChangesRequested, VersionState::Submitted)
            | (VersionState::Submitted, VersionState::ApprovedStaging)
            | (VersionState::ApprovedStaging, VersionState::Staging)
            | (VersionState::Staging, VersionState::ApprovedProd)
            | (VersionState::ApprovedProd, VersionState::Production)
    )
}
