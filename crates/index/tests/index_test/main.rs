/// Integration tests for the persisted index: build-or-load policy,
/// forced rebuilds and corruption handling.

mod helpers;
mod open_or_build;
