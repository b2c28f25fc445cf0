//! Flutter-facing bridge for Journi core.
//! Only `api` is exported to Dart; all state lives in `journi_core`.

pub mod api;
