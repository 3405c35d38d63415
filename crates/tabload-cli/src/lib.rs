//! Library side of the `tabload` command: configuration resolution, logging
//! setup and the folder load pipeline.

pub mod config;
pub mod logging;
pub mod pipeline;
