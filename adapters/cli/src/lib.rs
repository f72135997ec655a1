#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Host-side plumbing that feeds game frames to the decision policy.

pub mod frame_log;
pub mod host;
pub mod settings;
