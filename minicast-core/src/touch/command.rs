//! Line-oriented commands understood by the touch helper.
//!
//! ```text
//! d <contact> <x> <y> <pressure>\n   press
//! m <contact> <x> <y> <pressure>\n   move
//! u <contact>\n                      release
//! c\n                                commit pending gestures
//! ```

use std::fmt;

/// Only single-touch gestures are issued.
pub const DEFAULT_CONTACT: u32 = 0;

/// Pressure sent with every press and move.
pub const DEFAULT_PRESSURE: u32 = 50;

/// A single touch protocol command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchCommand {
    Down {
        contact: u32,
        x: i32,
        y: i32,
        pressure: u32,
    },
    Move {
        contact: u32,
        x: i32,
        y: i32,
        pressure: u32,
    },
    Up {
        contact: u32,
    },
    Commit,
}

impl TouchCommand {
    /// Press contact 0 at `(x, y)` with the default pressure.
    pub fn down(x: i32, y: i32) -> Self {
        Self::Down {
            contact: DEFAULT_CONTACT,
            x,
            y,
            pressure: DEFAULT_PRESSURE,
        }
    }

    /// Move contact 0 to `(x, y)` with the default pressure.
    pub fn move_to(x: i32, y: i32) -> Self {
        Self::Move {
            contact: DEFAULT_CONTACT,
            x,
            y,
            pressure: DEFAULT_PRESSURE,
        }
    }

    /// Release contact 0.
    pub fn up() -> Self {
        Self::Up {
            contact: DEFAULT_CONTACT,
        }
    }

    /// Wire form, newline terminated.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TouchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TouchCommand::Down {
                contact,
                x,
                y,
                pressure,
            } => writeln!(f, "d {contact} {x} {y} {pressure}"),
            TouchCommand::Move {
                contact,
                x,
                y,
                pressure,
            } => writeln!(f, "m {contact} {x} {y} {pressure}"),
            TouchCommand::Up { contact } => writeln!(f, "u {contact}"),
            TouchCommand::Commit => writeln!(f, "c"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_forms() {
        assert_eq!(TouchCommand::down(12, 34).encode(), "d 0 12 34 50\n");
        assert_eq!(TouchCommand::move_to(5, 6).encode(), "m 0 5 6 50\n");
        assert_eq!(TouchCommand::up().encode(), "u 0\n");
        assert_eq!(TouchCommand::Commit.encode(), "c\n");
    }

    #[test]
    fn explicit_contact_and_pressure() {
        let cmd = TouchCommand::Down {
            contact: 2,
            x: 1,
            y: 1,
            pressure: 200,
        };
        assert_eq!(cmd.encode(), "d 2 1 1 200\n");
    }
}
