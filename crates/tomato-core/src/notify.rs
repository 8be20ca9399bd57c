//! Desktop notifications on phase change.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::timer::{Phase, PhaseCategory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    /// Message announcing the phase that just began.
    pub fn for_phase(phase: Phase) -> Self {
        let (title, body) = match phase.category() {
            PhaseCategory::Focus => ("Focus time", "Let's get to work!"),
            PhaseCategory::Break => ("Break time", "Relax a bit."),
        };
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification permission denied")]
    PermissionDenied,
    #[error("notification backend failed: {0}")]
    Backend(String),
}

pub trait Notifier: Send {
    fn notify(&mut self, notification: &Notification) -> Result<(), NotifyError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _notification: &Notification) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Announce `phase` if notifications are enabled; failures are swallowed.
pub fn notify_phase(notifier: &mut dyn Notifier, phase: Phase, enabled: bool) {
    if !enabled {
        return;
    }
    if let Err(e) = notifier.notify(&Notification::for_phase(phase)) {
        debug!(?phase, error = %e, "notification not delivered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Inbox(Vec<Notification>);

    impl Notifier for Inbox {
        fn notify(&mut self, notification: &Notification) -> Result<(), NotifyError> {
            self.0.push(notification.clone());
            Ok(())
        }
    }

    #[test]
    fn text_depends_on_category() {
        assert_eq!(Notification::for_phase(Phase::Work).title, "Focus time");
        assert_eq!(Notification::for_phase(Phase::LongBreak).body, "Relax a bit.");
        assert_eq!(
            Notification::for_phase(Phase::ShortBreak),
            Notification::for_phase(Phase::LongBreak)
        );
    }

    #[test]
    fn disabled_sends_nothing() {
        let mut inbox = Inbox::default();
        notify_phase(&mut inbox, Phase::Work, false);
        assert!(inbox.0.is_empty());
        notify_phase(&mut inbox, Phase::Work, true);
        assert_eq!(inbox.0.len(), 1);
    }

    #[test]
    fn denied_permission_is_not_fatal() {
        struct Denied;
        impl Notifier for Denied {
            fn notify(&mut self, _: &Notification) -> Result<(), NotifyError> {
                Err(NotifyError::PermissionDenied)
            }
        }
        notify_phase(&mut Denied, Phase::ShortBreak, true);
    }
}
