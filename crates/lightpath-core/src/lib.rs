pub mod game;
pub mod player;
pub mod powerup;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::cell::Cell;
    use std::time::Duration;

    use crate::game::PlayerId;
    use crate::player::Player;
    use crate::time::{Clock, Timestamp};

    /// Create `n` test players with sequential IDs starting at 1.
    pub fn make_players(n: usize) -> Vec<Player> {
        (0..n).map(Player::for_slot).collect()
    }

    /// Ids of the first `n` players produced by [`make_players`].
    pub fn player_ids(n: usize) -> Vec<PlayerId> {
        (1..=n as PlayerId).collect()
    }

    /// Hand-driven clock for deterministic tests.
    #[derive(Debug, Default)]
    pub struct ManualClock {
        now_ms: Cell<u64>,
    }

    impl ManualClock {
        pub fn starting_at(ms: u64) -> Self {
            Self {
                now_ms: Cell::new(ms),
            }
        }

        pub fn advance(&self, by: Duration) {
            let ms = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
            self.now_ms.set(self.now_ms.get().saturating_add(ms));
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Timestamp {
            Timestamp::from_millis(self.now_ms.get())
        }
    }
}
