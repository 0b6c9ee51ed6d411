//! RowStatus textual convention (RFC 2579) and its state machine.

use std::fmt;

use crate::handler::SetResult;

/// RowStatus values.
///
/// `Active`, `NotInService` and `NotReady` are the states a stored row can be
/// in. `CreateAndGo`, `CreateAndWait` and `Destroy` are intents a manager
/// writes; a row only carries one of them while the PDU that wrote it is in
/// flight, and such a row is invisible to readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RowStatus {
    Active = 1,
    NotInService = 2,
    NotReady = 3,
    CreateAndGo = 4,
    CreateAndWait = 5,
    Destroy = 6,
}

impl RowStatus {
    /// Values a manager may write. `notReady` can only be read.
    pub const WRITABLE: &'static [i32] = &[1, 2, 4, 5, 6];

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Active),
            2 => Some(Self::NotInService),
            3 => Some(Self::NotReady),
            4 => Some(Self::CreateAndGo),
            5 => Some(Self::CreateAndWait),
            6 => Some(Self::Destroy),
            _ => None,
        }
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Whether a row in this state is seen by GET/GETNEXT and scans.
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Active | Self::NotInService | Self::NotReady)
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::NotInService => write!(f, "notInService"),
            Self::NotReady => write!(f, "notReady"),
            Self::CreateAndGo => write!(f, "createAndGo"),
            Self::CreateAndWait => write!(f, "createAndWait"),
            Self::Destroy => write!(f, "destroy"),
        }
    }
}

/// What a status write will do, decided before any row is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Create an empty row carrying the intent; resolved at ACTION.
    Create(RowStatus),
    /// Written value equals the stored one.
    NoOp,
    /// NotInService to Active; needs the row to be ready.
    Activate,
    /// Active to NotInService.
    Deactivate,
    /// Remove the row at COMMIT.
    Destroy,
}

/// Decide the transition for writing `intent` to a row currently in
/// `current` (`None` when the row does not exist).
///
/// Anything not listed as legal is `inconsistentValue`, including writes to
/// a row that another varbind of the same PDU is still creating or
/// destroying.
pub fn plan(current: Option<RowStatus>, intent: RowStatus) -> Result<Transition, SetResult> {
    use RowStatus::*;

    match (current, intent) {
        (None, CreateAndGo | CreateAndWait) => Ok(Transition::Create(intent)),
        (None, _) => Err(SetResult::InconsistentValue),

        (Some(NotReady), CreateAndWait) => Ok(Transition::NoOp),
        (Some(s), i) if s == i && s.is_visible() => Ok(Transition::NoOp),

        (Some(NotInService), Active) => Ok(Transition::Activate),
        (Some(Active), NotInService) => Ok(Transition::Deactivate),
        (Some(Active | NotInService | NotReady), Destroy) => Ok(Transition::Destroy),

        _ => Err(SetResult::InconsistentValue),
    }
}

/// Resolve a planned transition into the status the row ends up with.
///
/// `ready` is the row's mandatory-columns predicate, evaluated after every
/// column write of the PDU has been applied.
pub fn resolve(
    transition: Transition,
    current: RowStatus,
    ready: bool,
) -> Result<RowStatus, SetResult> {
    match transition {
        Transition::Create(RowStatus::CreateAndGo) if ready => Ok(RowStatus::Active),
        Transition::Create(RowStatus::CreateAndGo) => Err(SetResult::InconsistentValue),
        Transition::Create(_) if ready => Ok(RowStatus::NotInService),
        Transition::Create(_) => Ok(RowStatus::NotReady),
        Transition::Activate if ready => Ok(RowStatus::Active),
        Transition::Activate => Err(SetResult::InconsistentValue),
        Transition::Deactivate => Ok(RowStatus::NotInService),
        Transition::Destroy => Ok(RowStatus::Destroy),
        // A NotReady row completed by a column write in the same PDU
        Transition::NoOp if current == RowStatus::NotReady && ready => Ok(RowStatus::NotInService),
        Transition::NoOp => Ok(current),
    }
}
