use crate::ledger::CalorieLedger;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Mutex<CalorieLedger>>,
}

impl AppState {
    pub fn new(ledger: CalorieLedger) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }
}
