//! End-to-end flows against mock HTTP servers.

mod cli_tests;
mod fixture;
mod publish_tests;
mod resolve_tests;
