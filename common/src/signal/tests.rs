use std::time::Duration;

use tokio::process::Command;

use super::*;

#[tokio::test]
async fn test_signal() {
    let mut handler = SignalHandler::new()
        .with_signal(SignalKind::interrupt())
        .with_signal(SignalKind::terminate())
        .with_signal(SignalKind::terminate());

    // Send the signals to our own pid so the handler can observe them.
    let pid = std::process::id();

    Command::new("kill")
        .arg("-s")
        .arg("SIGINT")
        .arg(pid.to_string())
        .status()
        .await
        .expect("failed to send SIGINT");

    let kind = tokio::time::timeout(Duration::from_secs(1), handler.recv())
        .await
        .expect("failed to receive signal");
    assert_eq!(kind, SignalKind::interrupt());

    Command::new("kill")
        .arg("-s")
        .arg("SIGTERM")
        .arg(pid.to_string())
        .status()
        .await
        .expect("failed to send SIGTERM");

    let kind = tokio::time::timeout(Duration::from_secs(1), handler.recv())
        .await
        .expect("failed to receive signal");
    assert_eq!(kind, SignalKind::terminate());
}
