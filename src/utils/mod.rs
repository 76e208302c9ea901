pub mod dates;
pub mod kv_store;
