use tokio::sync::broadcast;
use tracing::{info, warn};

/// Reason the session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interrupted {
    OsSigInt,
    UserInt,
}

/// Hands the shutdown reason to every task listening on the interrupt channel
#[derive(Debug, Clone)]
pub struct Terminator {
    interrupt_tx: broadcast::Sender<Interrupted>,
}

impl Terminator {
    pub fn new(interrupt_tx: broadcast::Sender<Interrupted>) -> Self {
        Self { interrupt_tx }
    }

    pub fn terminate(&mut self, interrupted: Interrupted) -> anyhow::Result<()> {
        self.interrupt_tx.send(interrupted)?;

        Ok(())
    }
}

async fn terminate_by_ctrl_c(mut terminator: Terminator) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "could not listen for the interrupt signal");
        return;
    }

    info!("received interrupt signal");

    let _ = terminator.terminate(Interrupted::OsSigInt);
}

// create a broadcast channel for retrieving the application kill signal
pub fn create_termination() -> (Terminator, broadcast::Receiver<Interrupted>) {
    let (tx, rx) = broadcast::channel(1);
    let terminator = Terminator::new(tx);

    tokio::spawn(terminate_by_ctrl_c(terminator.clone()));

    (terminator, rx)
}
