//! Navigation subscriber trait

use super::NavigationContext;

/// Trait for components that need to respond to cursor or book changes
pub trait NavigationSubscriber: Send + Sync {
    /// Called after a transition that changed the navigation state
    fn on_navigation_change(&self, context: &NavigationContext);
}
