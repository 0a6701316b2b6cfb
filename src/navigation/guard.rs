//! Route guard. A pure function of the session snapshot and the requested
//! path: no I/O, no failure mode. Client-side gating is UX only; the bill
//! service must enforce its own access rules.

use super::intent::NavigationIntent;
use super::routes::{self, segments};
use crate::session::{AuthState, Session};

/// Outcome of a guard check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Provider has not reported yet; render a placeholder and wait.
    Suspend,
    Allow,
    /// Signed out on a guarded path; go to the login view.
    Redirect(NavigationIntent),
}

/// One guarded path pattern; `:name` segments match any single segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Self {
        let segments = segments(pattern)
            .into_iter()
            .map(|segment| {
                if segment.starts_with(':') {
                    Segment::Param
                } else {
                    Segment::Literal(segment.to_string())
                }
            })
            .collect();
        Self { segments }
    }

    pub fn matches(&self, path: &str) -> bool {
        let requested = segments(path);
        requested.len() == self.segments.len()
            && self
                .segments
                .iter()
                .zip(requested)
                .all(|(pattern, segment)| match pattern {
                    Segment::Param => true,
                    Segment::Literal(literal) => literal == segment,
                })
    }
}

/// Set of paths that require a signed-in identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardedPaths {
    patterns: Vec<PathPattern>,
}

impl GuardedPaths {
    pub fn new<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            patterns: patterns.into_iter().map(PathPattern::new).collect(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(path))
    }
}

impl Default for GuardedPaths {
    fn default() -> Self {
        Self::new([routes::ADD_BILL, "/bills/:id", routes::MY_BILLS])
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteGuard {
    guarded: GuardedPaths,
}

impl RouteGuard {
    pub fn new(guarded: GuardedPaths) -> Self {
        Self { guarded }
    }

    pub fn is_guarded(&self, path: &str) -> bool {
        self.guarded.contains(path)
    }

    /// Decides whether `path` is reachable with `session`.
    pub fn evaluate(&self, session: &Session, path: &str) -> GuardDecision {
        if !self.is_guarded(path) {
            return GuardDecision::Allow;
        }

        match session.state() {
            AuthState::Initializing => GuardDecision::Suspend,
            AuthState::SignedIn(_) => GuardDecision::Allow,
            AuthState::SignedOut => {
                GuardDecision::Redirect(NavigationIntent::to_login(&routes::normalize(path)))
            }
        }
    }
}
