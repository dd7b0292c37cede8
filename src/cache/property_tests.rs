//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the capacity, write-through and recency guarantees
//! of the cache engine against a plain map model of the store.

use proptest::prelude::*;
use std::collections::BTreeMap;
use tokio_test::block_on;

use crate::cache::CacheEngine;
use crate::error::CacheError;
use crate::record::{Record, RecordId};
use crate::store::{InMemoryStore, RecordStore};

// == Strategies ==
/// Generates record payloads
fn name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,32}".prop_map(|s| s)
}

/// Engine operations. `slot` picks one of the ids handed out so far.
#[derive(Debug, Clone)]
enum CacheOp {
    Put { name: String },
    Update { slot: usize, name: String },
    Get { slot: usize },
    Remove { slot: usize },
    ClearCacheOnly,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => name_strategy().prop_map(|name| CacheOp::Put { name }),
        1 => (any::<usize>(), name_strategy())
            .prop_map(|(slot, name)| CacheOp::Update { slot, name }),
        3 => any::<usize>().prop_map(|slot| CacheOp::Get { slot }),
        1 => any::<usize>().prop_map(|slot| CacheOp::Remove { slot }),
        1 => Just(CacheOp::ClearCacheOnly),
    ]
}

fn new_engine(max_size: usize) -> CacheEngine<InMemoryStore> {
    CacheEngine::new(InMemoryStore::new(), max_size)
}

fn pick(ids: &[RecordId], slot: usize) -> Option<RecordId> {
    if ids.is_empty() {
        None
    } else {
        Some(ids[slot % ids.len()])
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations the cache never holds more than max_size
    // records, the store always matches the model, and every Get returns the
    // latest durable value.
    #[test]
    fn prop_engine_matches_store_model(
        max_size in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..60)
    ) {
        block_on(async {
            let engine = new_engine(max_size);
            let mut ids: Vec<RecordId> = Vec::new();
            let mut model: BTreeMap<RecordId, String> = BTreeMap::new();

            for op in ops {
                match op {
                    CacheOp::Put { name } => {
                        let saved = engine.put(Record::new(name.clone())).await.unwrap();
                        let id = saved.id.unwrap();
                        prop_assert!(!ids.contains(&id), "Store reused id {}", id);
                        ids.push(id);
                        model.insert(id, name);
                    }
                    CacheOp::Update { slot, name } => {
                        if let Some(id) = pick(&ids, slot) {
                            engine.put(Record::with_id(id, name.clone())).await.unwrap();
                            model.insert(id, name);
                        }
                    }
                    CacheOp::Get { slot } => {
                        if let Some(id) = pick(&ids, slot) {
                            match (engine.get(id).await, model.get(&id)) {
                                (Ok(record), Some(name)) => {
                                    prop_assert_eq!(&record.name, name);
                                }
                                (Err(CacheError::NotFound(_)), None) => {}
                                (other, expected) => {
                                    prop_assert!(
                                        false,
                                        "Get({}) returned {:?}, expected {:?}",
                                        id,
                                        other,
                                        expected
                                    );
                                }
                            }
                        }
                    }
                    CacheOp::Remove { slot } => {
                        if let Some(id) = pick(&ids, slot) {
                            engine.remove(id).await.unwrap();
                            model.remove(&id);
                        }
                    }
                    CacheOp::ClearCacheOnly => engine.clear_cache_only().await,
                }

                let cached = engine.cached_ids().await;
                prop_assert!(
                    cached.len() <= max_size,
                    "Cache size {} exceeds max {}",
                    cached.len(),
                    max_size
                );
                for id in &cached {
                    prop_assert!(model.contains_key(id), "Cached id {} is not durable", id);
                }
                prop_assert_eq!(engine.store().len(), model.len());
            }

            for (id, name) in &model {
                let stored = engine.store().find_by_id(*id).await.unwrap();
                prop_assert_eq!(stored, Some(Record::with_id(*id, name.clone())));
            }
            Ok::<(), TestCaseError>(())
        })?;
    }

    // Inserting N+1 distinct records into a cache of size N evicts exactly the
    // first one, which is still served from the store and re-cached.
    #[test]
    fn prop_lru_eviction_order(
        names in prop::collection::vec(name_strategy(), 2..10)
    ) {
        block_on(async {
            let capacity = names.len() - 1;
            let engine = new_engine(capacity);

            let mut ids = Vec::new();
            for name in &names {
                ids.push(engine.put(Record::new(name.clone())).await.unwrap().id.unwrap());
            }

            prop_assert_eq!(engine.len().await, capacity);
            prop_assert!(!engine.contains(ids[0]).await, "Oldest record should be evicted");
            prop_assert_eq!(engine.cached_ids().await, ids[1..].to_vec());

            let first = engine.get(ids[0]).await.unwrap();
            prop_assert_eq!(&first.name, &names[0]);
            prop_assert!(engine.contains(ids[0]).await);
            prop_assert!(!engine.contains(ids[1]).await, "New LRU record should be evicted");
            prop_assert_eq!(engine.len().await, capacity);
            Ok::<(), TestCaseError>(())
        })?;
    }

    // A Get on a cached record makes it most recently used, so the next
    // overflow evicts the record after it instead.
    #[test]
    fn prop_lru_access_tracking(
        names in prop::collection::vec(name_strategy(), 3..8),
        new_name in name_strategy()
    ) {
        block_on(async {
            let capacity = names.len();
            let engine = new_engine(capacity);

            let mut ids = Vec::new();
            for name in &names {
                ids.push(engine.put(Record::new(name.clone())).await.unwrap().id.unwrap());
            }

            engine.get(ids[0]).await.unwrap();
            engine.put(Record::new(new_name)).await.unwrap();

            prop_assert!(engine.contains(ids[0]).await, "Touched record should survive");
            prop_assert!(!engine.contains(ids[1]).await, "Second record should be evicted");
            Ok::<(), TestCaseError>(())
        })?;
    }

    // Remove then Get always reports NotFound, whether or not the record was cached.
    #[test]
    fn prop_remove_then_get_not_found(
        name in name_strategy(),
        evict_first in any::<bool>()
    ) {
        block_on(async {
            let engine = new_engine(1);
            let id = engine.put(Record::new(name)).await.unwrap().id.unwrap();
            if evict_first {
                engine.put(Record::new("filler")).await.unwrap();
            }

            engine.remove(id).await.unwrap();
            engine.remove(id).await.unwrap();

            prop_assert!(matches!(engine.get(id).await, Err(CacheError::NotFound(_))));
            Ok::<(), TestCaseError>(())
        })?;
    }
}

// == Property Test for Error Response Format ==
// This tests the CacheError -> HTTP response conversion

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Every error becomes a JSON body with an "error" field carrying the message.
    #[test]
    fn prop_error_response_format(message in "[a-zA-Z0-9 ]{1,64}", kind in 0u8..5) {
        use axum::response::IntoResponse;

        let err = match kind {
            0 => CacheError::NotFound(message.clone()),
            1 => CacheError::InvalidKey(message.clone()),
            2 => CacheError::StoreUnavailable(message.clone()),
            3 => CacheError::InvalidRequest(message.clone()),
            _ => CacheError::Internal(message.clone()),
        };
        let expected = err.to_string();

        let body = block_on(async {
            let response = err.into_response();
            axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap()
        });
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        prop_assert_eq!(json["error"].as_str(), Some(expected.as_str()));
        prop_assert!(expected.contains(&message));
    }
}
