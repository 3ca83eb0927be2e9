/// Development utilities module
///
/// This module contains utilities for development and testing,
/// such as the in-memory mock site.

pub mod mock_site;
