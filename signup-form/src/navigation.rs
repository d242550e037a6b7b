use crossbeam::channel;

pub const DEFAULT_REDIRECT_PATH: &str = "/admin";

/// Hands control to whatever owns routing once an account was created.
pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
}

/// Receiving end of navigation requests.
#[derive(Debug)]
pub struct NavigationChannel {
    sender: channel::Sender<String>,
    receiver: channel::Receiver<String>,
}

impl NavigationChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel::unbounded();
        Self { sender, receiver }
    }

    pub fn sender(&self) -> NavigationSender {
        NavigationSender(self.sender.clone())
    }

    pub fn drain(&self) -> Vec<String> {
        self.receiver.try_iter().collect()
    }
}

impl Default for NavigationChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct NavigationSender(channel::Sender<String>);

impl Navigator for NavigationSender {
    fn push(&self, path: &str) {
        if self.0.send(path.to_string()).is_err() {
            tracing::warn!("navigation to {} dropped, receiver disconnected", path);
        }
    }
}
