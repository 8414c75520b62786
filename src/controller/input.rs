/// Platform-agnostic keyboard mapping onto camera commands
use crate::config::NavigationConfig;

/// One camera operation with its step size already applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavCommand {
    Forward(f32),
    Backward(f32),
    Left(f32),
    Right(f32),
    Up(f32),
    Down(f32),
    TurnLeft(f32),
    TurnRight(f32),
    TiltUp(f32),
    TiltDown(f32),
    Reset,
}

/// Key mapping configuration.
///
/// Keys are physical key codes as reported by `KeyboardEvent.code` in the
/// browser, which match the `Debug` names of winit's `KeyCode`.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub forward: Vec<String>,
    pub backward: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub turn_left: Vec<String>,
    pub turn_right: Vec<String>,
    pub tilt_up: Vec<String>,
    pub tilt_down: Vec<String>,
    pub reset: Vec<String>,
    pub steps: NavigationConfig,
}

fn keys(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_config(&NavigationConfig::default())
    }
}

impl KeyBindings {
    pub fn from_config(steps: &NavigationConfig) -> Self {
        Self {
            forward: keys(&["KeyW"]),
            backward: keys(&["KeyS"]),
            left: keys(&["KeyA"]),
            right: keys(&["KeyD"]),
            up: keys(&["Space", "KeyI"]),
            down: keys(&["ShiftLeft", "ControlLeft", "KeyK"]),
            turn_left: keys(&["KeyQ", "KeyJ", "ArrowLeft"]),
            turn_right: keys(&["KeyE", "KeyL", "ArrowRight"]),
            tilt_up: keys(&["ArrowUp"]),
            tilt_down: keys(&["ArrowDown"]),
            reset: keys(&["KeyR"]),
            steps: steps.clone(),
        }
    }

    /// Command bound to a key code, if any.
    pub fn command_for(&self, code: &str) -> Option<NavCommand> {
        let bound = |list: &[String]| list.iter().any(|k| k == code);
        let s = &self.steps;

        if bound(&self.forward) {
            Some(NavCommand::Forward(s.step))
        } else if bound(&self.backward) {
            Some(NavCommand::Backward(s.step))
        } else if bound(&self.left) {
            Some(NavCommand::Left(s.step))
        } else if bound(&self.right) {
            Some(NavCommand::Right(s.step))
        } else if bound(&self.up) {
            Some(NavCommand::Up(s.step))
        } else if bound(&self.down) {
            Some(NavCommand::Down(s.step))
        } else if bound(&self.turn_left) {
            Some(NavCommand::TurnLeft(s.turn_step))
        } else if bound(&self.turn_right) {
            Some(NavCommand::TurnRight(s.turn_step))
        } else if bound(&self.tilt_up) {
            Some(NavCommand::TiltUp(s.tilt_step))
        } else if bound(&self.tilt_down) {
            Some(NavCommand::TiltDown(s.tilt_step))
        } else if bound(&self.reset) {
            Some(NavCommand::Reset)
        } else {
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use super::*;
    use web_sys::KeyboardEvent;

    pub fn keyboard_event_to_command(bindings: &KeyBindings, e: &KeyboardEvent) -> Option<NavCommand> {
        bindings.command_for(&e.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.command_for("KeyW"), Some(NavCommand::Forward(0.2)));
        assert_eq!(bindings.command_for("KeyS"), Some(NavCommand::Backward(0.2)));
        assert_eq!(bindings.command_for("KeyA"), Some(NavCommand::Left(0.2)));
        assert_eq!(bindings.command_for("KeyD"), Some(NavCommand::Right(0.2)));
        assert_eq!(bindings.command_for("Space"), Some(NavCommand::Up(0.2)));
        assert_eq!(bindings.command_for("ShiftLeft"), Some(NavCommand::Down(0.2)));
        assert_eq!(bindings.command_for("ArrowLeft"), Some(NavCommand::TurnLeft(PI / 24.0)));
        assert_eq!(bindings.command_for("KeyE"), Some(NavCommand::TurnRight(PI / 24.0)));
        assert_eq!(bindings.command_for("ArrowUp"), Some(NavCommand::TiltUp(PI / 48.0)));
        assert_eq!(bindings.command_for("ArrowDown"), Some(NavCommand::TiltDown(PI / 48.0)));
        assert_eq!(bindings.command_for("KeyR"), Some(NavCommand::Reset));
    }

    #[test]
    fn test_aliases_share_a_command() {
        let bindings = KeyBindings::default();
        for code in ["KeyQ", "KeyJ", "ArrowLeft"] {
            assert_eq!(bindings.command_for(code), Some(NavCommand::TurnLeft(PI / 24.0)), "{code}");
        }
        for code in ["ShiftLeft", "ControlLeft", "KeyK"] {
            assert_eq!(bindings.command_for(code), Some(NavCommand::Down(0.2)), "{code}");
        }
    }

    #[test]
    fn test_unbound_and_case_sensitive_keys() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.command_for("KeyZ"), None);
        assert_eq!(bindings.command_for("keyw"), None);
        assert_eq!(bindings.command_for(""), None);
    }

    #[test]
    fn test_step_sizes_follow_config() {
        let bindings = KeyBindings::from_config(&NavigationConfig {
            step: 1.5,
            turn_step: 0.1,
            tilt_step: 0.05,
        });
        assert_eq!(bindings.command_for("KeyW"), Some(NavCommand::Forward(1.5)));
        assert_eq!(bindings.command_for("KeyL"), Some(NavCommand::TurnRight(0.1)));
        assert_eq!(bindings.command_for("ArrowDown"), Some(NavCommand::TiltDown(0.05)));
    }
}
