// Per-tick player command
//
// The product of whatever input layer sits above the core: one movement
// vector plus the dash/special triggers, delivered explicitly every tick.
// "No input" is a neutral command, never an absent one - the body must be
// told to brake, not left coasting on stale acceleration.

use glam::Vec2;

/// One player's input for one fixed tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerCommand {
    /// Desired movement direction on the ground plane; zero means "stop".
    /// Magnitudes above 1 are normalized by the body.
    pub direction: Vec2,
    /// Dash trigger (edge, not level)
    pub dash: bool,
    /// Special ability trigger (edge, not level)
    pub special: bool,
}

impl PlayerCommand {
    /// The explicit "no input" command
    pub fn neutral() -> Self {
        Self {
            direction: Vec2::ZERO,
            dash: false,
            special: false,
        }
    }

    /// Movement-only command
    pub fn move_toward(direction: Vec2) -> Self {
        Self {
            direction,
            ..Self::neutral()
        }
    }

    pub fn with_dash(mut self) -> Self {
        self.dash = true;
        self
    }

    pub fn with_special(mut self) -> Self {
        self.special = true;
        self
    }
}

impl Default for PlayerCommand {
    fn default() -> Self {
        Self::neutral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_is_default() {
        assert_eq!(PlayerCommand::default(), PlayerCommand::neutral());
        assert_eq!(PlayerCommand::neutral().direction, Vec2::ZERO);
        assert!(!PlayerCommand::neutral().dash);
        assert!(!PlayerCommand::neutral().special);
    }

    #[test]
    fn test_builders_compose() {
        let cmd = PlayerCommand::move_toward(Vec2::X).with_dash().with_special();
        assert_eq!(cmd.direction, Vec2::X);
        assert!(cmd.dash);
        assert!(cmd.special);
    }
}
