//! HTTP end-to-end tests: a real server on 127.0.0.1:0 with a mock LLM.
//! Run with `--nocapture` to see `[e2e]` lines.

mod chat;
mod common;
mod sessions;
mod static_files;
