pub mod indexed_map;
pub mod ttl_cache;
