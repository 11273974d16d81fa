// Library target exists solely for the integration tests in tests/.
// The binary entry point is main.rs; this file re-declares the module tree
// so the test harness can import types via `examdesk::exam::*` /
// `examdesk::app::*`. Most code is only exercised through the binary, so
// suppress dead_code warnings.
#![allow(dead_code)]

pub mod api;
pub mod app;
pub mod config;
pub mod exam;
pub mod ui;

mod event;
