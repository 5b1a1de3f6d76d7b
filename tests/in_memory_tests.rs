//! Integration tests for InMemoryKeyValueStore using the storage test harness.
//!
//! This file invokes `key_value_store_tests!` to validate that
//! InMemoryKeyValueStore fully conforms to the KeyValueStore contract.

#[macro_use]
mod storage_harness;

use storage_harness::*;

key_value_store_tests!(in_memory_store());
