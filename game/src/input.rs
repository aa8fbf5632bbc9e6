use winit::event::VirtualKeyCode;

use crate::session::Action;

/// Arrow keys move, space drops a bomb. Anything else is ignored.
pub fn action_for_key(key: VirtualKeyCode) -> Option<Action> {
    match key {
        VirtualKeyCode::Up => Some(Action::Up),
        VirtualKeyCode::Down => Some(Action::Down),
        VirtualKeyCode::Left => Some(Action::Left),
        VirtualKeyCode::Right => Some(Action::Right),
        VirtualKeyCode::Space => Some(Action::PlaceBomb),
        _ => None,
    }
}
