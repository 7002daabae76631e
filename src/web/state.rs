use std::sync::Arc;

use crate::fleet::StatusHandle;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub scheduler: StatusHandle,
}
