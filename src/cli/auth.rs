use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{Res, config::Config, spotify, types::PkceToken};

pub async fn auth(config: Config) -> Res<()> {
    let shared_state: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
    spotify::auth::auth(config, shared_state).await
}
