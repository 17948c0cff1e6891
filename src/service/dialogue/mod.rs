use std::sync::Arc;

use model::InteractionMode;
use teloxide::dispatching::dialogue::{serializer::Json, ErasedStorage, InMemStorage, RedisStorage, Storage};

use crate::{config::DialogueConfig, storage::StorageError};

use super::ServiceError;

pub mod model;

pub struct DialogueService;

impl DialogueService {
    pub async fn get_dialogue_storage(
        config: &DialogueConfig,
    ) -> Result<Arc<ErasedStorage<InteractionMode>>, ServiceError> {
        let storage = match &config.redis_url {
            Some(redis_url) => {
                info!("Using Redis dialogue storage");
                RedisStorage::open(redis_url.as_str(), Json)
                    .await
                    .map_err(|e| StorageError::Dialogue(e.to_string()))?
                    .erase()
            }
            None => {
                info!("Using in-memory dialogue storage");
                InMemStorage::<InteractionMode>::new().erase()
            }
        };

        Ok(storage)
    }
}
