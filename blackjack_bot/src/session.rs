use crate::PlayAction;

/// Keeps a run of double downs from getting too long.
///
/// Every decision passes through [`SessionGuard::apply`] exactly once. Once
/// `limit` double downs have gone out in a row, the next one is played as a
/// hit and the run starts over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGuard {
    consecutive_doubles: u8,
    limit: u8,
}

impl SessionGuard {
    pub fn new(limit: u8) -> Self {
        SessionGuard {
            consecutive_doubles: 0,
            limit,
        }
    }

    /// Starts the guard part way through a run. The count is capped at `limit`.
    pub fn with_count(limit: u8, consecutive_doubles: u8) -> Self {
        SessionGuard {
            consecutive_doubles: consecutive_doubles.min(limit),
            limit,
        }
    }

    pub fn apply(&mut self, action: PlayAction) -> PlayAction {
        match action {
            PlayAction::DoubleDown if self.consecutive_doubles >= self.limit => {
                log::debug!(
                    "{} double downs in a row, hitting instead",
                    self.consecutive_doubles
                );
                self.reset();
                PlayAction::Hit
            }
            PlayAction::DoubleDown => {
                self.consecutive_doubles += 1;
                action
            }
            _ => {
                self.reset();
                action
            }
        }
    }

    pub fn reset(&mut self) {
        self.consecutive_doubles = 0;
    }

    pub fn consecutive_doubles(&self) -> u8 {
        self.consecutive_doubles
    }

    pub fn limit(&self) -> u8 {
        self.limit
    }
}

impl Default for SessionGuard {
    fn default() -> Self {
        SessionGuard::new(3)
    }
}
