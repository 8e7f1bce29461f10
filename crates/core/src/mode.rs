/// Navigation keys the grid reacts to while a cell is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Tab,
    ShiftTab,
    Enter,
}

impl NavKey {
    /// Map a host key name (`"ArrowUp"`, `"Tab"`, ...) to a nav key.
    /// Anything else is not a navigation key.
    pub fn from_name(name: &str, shift: bool) -> Option<Self> {
        match name {
            "ArrowUp" | "Up" => Some(NavKey::Up),
            "ArrowDown" | "Down" => Some(NavKey::Down),
            "ArrowLeft" | "Left" => Some(NavKey::Left),
            "ArrowRight" | "Right" => Some(NavKey::Right),
            "Tab" if shift => Some(NavKey::ShiftTab),
            "Tab" => Some(NavKey::Tab),
            "Enter" | "Return" => Some(NavKey::Enter),
            _ => None,
        }
    }

    /// (row delta, column delta)
    pub fn delta(&self) -> (isize, isize) {
        match self {
            NavKey::Up => (-1, 0),
            NavKey::Down | NavKey::Enter => (1, 0),
            NavKey::Left | NavKey::ShiftTab => (0, -1),
            NavKey::Right | NavKey::Tab => (0, 1),
        }
    }
}
