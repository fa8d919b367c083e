use tokio::signal::unix::{Signal, SignalKind};

/// Listens for any of a set of unix signals.
#[derive(Default)]
pub struct SignalHandler {
    signals: Vec<(SignalKind, Signal)>,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signal(mut self, kind: SignalKind) -> Self {
        if self.signals.iter().any(|(k, _)| *k == kind) {
            return self;
        }

        let signal = tokio::signal::unix::signal(kind).expect("failed to create signal");
        self.signals.push((kind, signal));

        self
    }

    /// Waits for the next registered signal to arrive. Pends forever if no
    /// signals have been registered.
    pub async fn recv(&mut self) -> SignalKind {
        if self.signals.is_empty() {
            return std::future::pending().await;
        }

        let (kind, _, _) = futures::future::select_all(self.signals.iter_mut().map(
            |(kind, signal)| {
                Box::pin(async {
                    signal.recv().await;
                    *kind
                })
            },
        ))
        .await;

        kind
    }
}

#[cfg(test)]
mod tests;
