mod error;
mod data_types;
mod rank_index;
mod expiry;
mod traits;
mod hash_ops;
mod list_ops;
mod set_ops;
mod zset_ops;
mod store_core;
mod store_manager;

pub use error::{StoreError, StoreResult};
pub use data_types::{normalize_index, normalize_range, DataType, HashValue, Kind, SortedSetValue};
pub use expiry::{now_ms, ExpiryManager};
pub use traits::{
    HashOperations, KeyOperations, ListOperations, SetOperations, SortedSetOperations,
};
pub use set_ops::SetAlgebra;
pub use store_core::Store;
pub use store_manager::{ExpirySweeper, StoreManager};
