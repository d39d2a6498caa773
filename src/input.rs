use macroquad::input::{KeyCode, get_keys_pressed};

use odoline_kinematics::DriveCommand;

/// Key bindings, one key per command.
pub const BINDINGS: [(KeyCode, DriveCommand); 6] = [
    (KeyCode::I, DriveCommand::Forward),
    (KeyCode::K, DriveCommand::Backward),
    (KeyCode::J, DriveCommand::PivotLeft),
    (KeyCode::L, DriveCommand::PivotRight),
    (KeyCode::U, DriveCommand::CurveLeft),
    (KeyCode::O, DriveCommand::CurveRight),
];

pub const QUIT_KEY: KeyCode = KeyCode::Escape;

pub fn command_for_key(key: KeyCode) -> Option<DriveCommand> {
    BINDINGS
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|(_, command)| *command)
}

/// Commands whose key went down this frame. Unbound keys are ignored.
pub fn pressed_commands() -> impl Iterator<Item = DriveCommand> {
    get_keys_pressed().into_iter().filter_map(command_for_key)
}
