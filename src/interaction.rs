// Local interaction state: which square is selected or dragged, and how user gestures
// translate into move requests.
//
// The user is not trusted: any gesture sequence is allowed and must not panic. Every
// gesture goes through `transition`, which is a pure function of the current state, the
// gesture and the last confirmed position.

use derive_new::new;

use crate::coord::Coord;
use crate::position::Position;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, new)]
pub struct MoveIntent {
    pub from: Coord,
    pub to: Coord,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Selected(Coord),
    // A drag also works as an implicit selection: candidates of the dragged piece are shown.
    Dragging(Coord),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Gesture {
    Click(Coord),
    DragStart(Coord),
    Drop(Coord),
    // Drag ended outside of the board or was cancelled by the user.
    DragCancel,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GestureError {
    NotOwnPiece(Coord),
    NoDragInProgress,
    GameOver,
    RequestPending,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GestureOutcome {
    Noop,
    Intent(MoveIntent),
    Rejected(GestureError),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Transition {
    pub state: InteractionState,
    pub outcome: GestureOutcome,
}

impl MoveIntent {
    pub fn to_uci(self) -> String { format!("{}{}", self.from, self.to) }

    pub fn from_uci(s: &str) -> Option<Self> {
        if !s.is_ascii() || s.len() != 4 {
            return None;
        }
        Some(MoveIntent {
            from: Coord::from_algebraic(&s[0..2])?,
            to: Coord::from_algebraic(&s[2..4])?,
        })
    }
}

impl InteractionState {
    // Square whose candidates should be shown.
    pub fn focus(self) -> Option<Coord> {
        match self {
            InteractionState::Idle => None,
            InteractionState::Selected(coord) | InteractionState::Dragging(coord) => Some(coord),
        }
    }
}

impl Transition {
    fn to(state: InteractionState) -> Self { Transition { state, outcome: GestureOutcome::Noop } }
    fn intent(state: InteractionState, intent: MoveIntent) -> Self {
        Transition { state, outcome: GestureOutcome::Intent(intent) }
    }
    fn rejected(state: InteractionState, error: GestureError) -> Self {
        Transition { state, outcome: GestureOutcome::Rejected(error) }
    }
}

pub fn transition(state: InteractionState, gesture: Gesture, position: &Position) -> Transition {
    use InteractionState::*;
    if position.is_terminated() {
        return Transition::rejected(Idle, GestureError::GameOver);
    }
    match (state, gesture) {
        (Idle, Gesture::Click(coord)) => {
            if position.has_own_piece(coord) {
                Transition::to(Selected(coord))
            } else {
                Transition::to(Idle)
            }
        }
        (Selected(selected), Gesture::Click(coord)) => {
            if coord == selected {
                Transition::to(Idle)
            } else if position.is_candidate(selected, coord) {
                // Selection is kept until the server responds.
                Transition::intent(state, MoveIntent::new(selected, coord))
            } else if position.has_own_piece(coord) {
                Transition::to(Selected(coord))
            } else {
                Transition::to(Idle)
            }
        }
        // The click that concludes a drag is not a selection.
        (Dragging(_), Gesture::Click(_)) => Transition::to(state),
        (_, Gesture::DragStart(coord)) => {
            if position.has_own_piece(coord) {
                Transition::to(Dragging(coord))
            } else {
                Transition::rejected(state, GestureError::NotOwnPiece(coord))
            }
        }
        (Dragging(source), Gesture::Drop(dest)) => {
            if dest == source {
                Transition::to(Selected(source))
            } else if position.is_candidate(source, dest) {
                Transition::intent(Selected(source), MoveIntent::new(source, dest))
            } else {
                Transition::to(Idle)
            }
        }
        (Idle | Selected(_), Gesture::Drop(_)) => {
            Transition::rejected(state, GestureError::NoDragInProgress)
        }
        (Dragging(_), Gesture::DragCancel) => Transition::to(Idle),
        (Idle | Selected(_), Gesture::DragCancel) => Transition::to(state),
    }
}

// Adjusts interaction state to a new position. Selection survives only if the selected
// square still has something to do; otherwise it would point at a stale piece.
pub fn reconcile(state: InteractionState, position: &Position) -> InteractionState {
    let keep = |coord: Coord| {
        !position.is_terminated()
            && position.has_own_piece(coord)
            && position.candidates(coord).is_some_and(|c| !c.is_empty())
    };
    match state {
        InteractionState::Idle => InteractionState::Idle,
        InteractionState::Selected(coord) | InteractionState::Dragging(coord) => {
            if keep(coord) {
                state
            } else {
                InteractionState::Idle
            }
        }
    }
}
