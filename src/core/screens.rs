//! Screen ordering used to infer slide direction.
//!
//! Screens are listed in flow order. Moving to a screen at or after the current
//! one slides forward, moving to an earlier one slides back. Screens missing
//! from the list always slide forward.

use crate::common::constants::DEFAULT_SCREENS;
use crate::core::phase::Direction;

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenOrder {
    screens: Vec<String>,
}

impl Default for ScreenOrder {
    fn default() -> Self {
        Self::new(DEFAULT_SCREENS)
    }
}

impl ScreenOrder {
    pub fn new<I, S>(screens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            screens: screens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn position(&self, screen: &str) -> Option<usize> {
        self.screens.iter().position(|s| s == screen)
    }

    pub fn screens(&self) -> &[String] {
        &self.screens
    }

    /// Direction for a move from `from` to `to`.
    pub fn direction_between(&self, from: Option<&str>, to: &str) -> Direction {
        match (from.and_then(|f| self.position(f)), self.position(to)) {
            (Some(current), Some(next)) if next < current => Direction::Backward,
            _ => Direction::Forward,
        }
    }
}
