//! Router capability: the component that actually swaps the displayed screen.
//!
//! The sequencer calls [`Router::navigate`] exactly once per completed
//! navigation, on the `Exiting → Entering` edge. Any `FnMut(&str)` is a router,
//! which keeps host integrations to a closure.

/// Imperative navigation capability owned by the host.
#[cfg_attr(test, mockall::automock)]
pub trait Router {
    /// Change the current location to `target`. Assumed to take effect before
    /// the next render.
    fn navigate(&mut self, target: &str);
}

impl<F> Router for F
where
    F: FnMut(&str),
{
    fn navigate(&mut self, target: &str) {
        self(target)
    }
}

/// Router that records every location it is sent to, like browser history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryRouter {
    entries: Vec<String>,
    navigations: usize,
}

impl HistoryRouter {
    /// Start with `initial` as the current location.
    pub fn starting_at(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            navigations: 0,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn history(&self) -> &[String] {
        &self.entries
    }

    /// Number of navigations performed, excluding the starting location.
    pub fn navigations(&self) -> usize {
        self.navigations
    }
}

impl Router for HistoryRouter {
    fn navigate(&mut self, target: &str) {
        self.entries.push(target.to_string());
        self.navigations += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_router_tracks_locations() {
        let mut router = HistoryRouter::starting_at("welcome");
        router.navigate("signup");
        router.navigate("login");

        assert_eq!(router.current(), Some("login"));
        assert_eq!(router.history(), ["welcome", "signup", "login"]);
        assert_eq!(router.navigations(), 2);
    }

    #[test]
    fn test_closure_is_a_router() {
        let mut seen = Vec::new();
        {
            let mut router = |target: &str| seen.push(target.to_string());
            Router::navigate(&mut router, "home");
        }
        assert_eq!(seen, ["home"]);
    }
}
