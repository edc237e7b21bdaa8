//! Best-effort desktop notifications.
//!
//! Delivery failures are logged at debug level and otherwise ignored; a
//! missing or broken `notify-send` must never affect a maintenance step.

use std::sync::Arc;
use std::time::Duration;
use upkeep_hal::SystemHal;

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);
const NOTIFY_TITLE: &str = "Upkeep";

#[derive(Clone)]
pub struct Notifier {
    hal: Arc<dyn SystemHal>,
    enabled: bool,
}

impl Notifier {
    pub fn new(hal: Arc<dyn SystemHal>) -> Self {
        let enabled = hal.tool_available("notify-send");
        Self { hal, enabled }
    }

    pub fn disabled(hal: Arc<dyn SystemHal>) -> Self {
        Self {
            hal,
            enabled: false,
        }
    }

    /// Fire-and-forget notification.
    pub fn notify(&self, message: &str) {
        if !self.enabled {
            return;
        }
        if let Err(err) =
            self.hal
                .command_status("notify-send", &[NOTIFY_TITLE, message], NOTIFY_TIMEOUT)
        {
            log::debug!("notification dropped: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upkeep_hal::{FakeHal, Operation};

    #[test]
    fn notifies_when_tool_is_available() {
        let fake = FakeHal::new();
        fake.set_tool_available("notify-send");
        let hal: Arc<dyn SystemHal> = Arc::new(fake.clone());

        Notifier::new(Arc::clone(&hal)).notify("maintenance started");

        assert!(fake.has_operation(|Operation::Command { program, args, .. }| {
            program == "notify-send" && args[1] == "maintenance started"
        }));
    }

    #[test]
    fn silent_when_tool_is_missing() {
        let fake = FakeHal::new();
        let hal: Arc<dyn SystemHal> = Arc::new(fake.clone());

        Notifier::new(Arc::clone(&hal)).notify("maintenance started");

        assert!(fake.operations().is_empty());
    }

    #[test]
    fn delivery_failure_is_swallowed() {
        let fake = FakeHal::new();
        fake.set_tool_available("notify-send");
        fake.fail_command("notify-send");
        let hal: Arc<dyn SystemHal> = Arc::new(fake.clone());

        // Must not panic or propagate.
        Notifier::new(Arc::clone(&hal)).notify("maintenance finished");
    }
}
