//! Flutter-facing bindings for MemoKeep core.

pub mod api;
