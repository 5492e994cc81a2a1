//! Property tests for content round-trips and icon handling.

mod content_props;
