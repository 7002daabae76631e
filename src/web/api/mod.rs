pub mod error;
pub mod fleet;
pub mod reference;

use serde::de::DeserializeOwned;

use crate::store::{self, Collection};
use crate::web::AppState;
use error::{ApiError, ApiResult};

/// Every record of a collection, in key order.
fn list<T: DeserializeOwned>(state: &AppState, collection: Collection) -> ApiResult<Vec<T>> {
    Ok(store::load_all(state.store.as_ref(), collection)?
        .into_iter()
        .map(|(_, value)| value)
        .collect())
}

fn find<T: DeserializeOwned>(state: &AppState, collection: Collection, id: &str) -> ApiResult<T> {
    store::get_json(state.store.as_ref(), collection, id)?.ok_or(ApiError::NotFound)
}
