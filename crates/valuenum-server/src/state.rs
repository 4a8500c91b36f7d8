use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;
use valuenum_core::{Config, Database, TokenSigner};

use crate::notify::Notifier;

/// Shared handler state.
///
/// The connection is not `Sync`, so every handler locks it for the length
/// of one query batch.
pub struct AppState {
    pub config: Config,
    pub db: Mutex<Database>,
    pub signer: Option<TokenSigner>,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Arc<Self> {
        let signer = match TokenSigner::new(&config.auth.jwt_secret) {
            Ok(signer) => Some(signer),
            Err(_) => {
                warn!("auth.jwt_secret is empty; bearer tokens will be refused");
                None
            }
        };
        let notifier = Notifier::from_config(&config.notify);

        Arc::new(Self {
            config,
            db: Mutex::new(db),
            signer,
            notifier,
        })
    }
}
