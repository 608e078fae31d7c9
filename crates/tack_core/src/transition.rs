//! Stuck/unstuck states and the transitions between them

use tack_platform::ElementId;

/// State of one marker's state machine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StickState {
    /// The sticky target sits in normal flow
    #[default]
    Unstuck,
    /// The sticky target is pinned
    Stuck,
}

impl StickState {
    /// The state a transition of `kind` leads to
    pub fn after(kind: TransitionKind) -> Self {
        match kind {
            TransitionKind::Stuck => StickState::Stuck,
            TransitionKind::Unstuck => StickState::Unstuck,
        }
    }
}

/// Which way a transition goes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    Stuck,
    Unstuck,
}

impl TransitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::Stuck => "stuck",
            TransitionKind::Unstuck => "unstuck",
        }
    }
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified boundary crossing, resolved to the sticky target it concerns
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub kind: TransitionKind,
    pub target: ElementId,
}

impl Transition {
    pub fn stuck(target: ElementId) -> Self {
        Self {
            kind: TransitionKind::Stuck,
            target,
        }
    }

    pub fn unstuck(target: ElementId) -> Self {
        Self {
            kind: TransitionKind::Unstuck,
            target,
        }
    }
}
