use crossbeam::channel;

/// Fire-and-forget side channel for top-level errors.
pub trait Notifier: Send + Sync {
    fn error(&self, message: String);
}

/// Receiving end of the notification channel, drained by the presentation layer
/// one message at a time.
#[derive(Debug)]
pub struct NotificationChannel {
    sender: channel::Sender<String>,
    receiver: channel::Receiver<String>,
}

impl NotificationChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel::unbounded();
        Self { sender, receiver }
    }

    /// Sending end, handed to the controller.
    pub fn sender(&self) -> NotificationSender {
        NotificationSender(self.sender.clone())
    }

    /// Next pending message, if any.
    pub fn try_next(&self) -> Option<String> {
        self.receiver.try_recv().ok()
    }

    pub fn drain(&self) -> Vec<String> {
        self.receiver.try_iter().collect()
    }
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct NotificationSender(channel::Sender<String>);

impl Notifier for NotificationSender {
    fn error(&self, message: String) {
        if self.0.send(message).is_err() {
            tracing::warn!("notification dropped, receiver disconnected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_delivered_in_order() {
        let notifications = NotificationChannel::new();
        let notifier = notifications.sender();
        notifier.error("first".to_string());
        notifier.error("second".to_string());
        assert_eq!(notifications.try_next().as_deref(), Some("first"));
        assert_eq!(notifications.drain(), vec!["second".to_string()]);
        assert!(notifications.try_next().is_none());
    }

    #[test]
    fn sending_after_receiver_is_gone_does_not_panic() {
        let notifier = NotificationChannel::new().sender();
        notifier.error("nobody listens".to_string());
    }
}
