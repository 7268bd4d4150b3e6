use crate::types::Vec2;

/// Logical actions delivered by the host's input layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputAction {
    PrimaryAttack,
    /// Held to block; a primary attack while blocking throws the weapon.
    AltAttack,
    /// `y` forward, `x` right, each in `[-1, 1]`.
    Move(Vec2),
    /// Pointer delta since the previous event.
    Look(Vec2),
    Jump,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonPhase {
    Pressed,
    Released,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputEvent {
    pub action: InputAction,
    pub phase: ButtonPhase,
}

impl InputEvent {
    pub fn pressed(action: InputAction) -> Self {
        Self {
            action,
            phase: ButtonPhase::Pressed,
        }
    }

    pub fn released(action: InputAction) -> Self {
        Self {
            action,
            phase: ButtonPhase::Released,
        }
    }
}
