/// End-to-end conversation tests over a small on-disk index with fake
/// embedding and chat-completion backends.

mod helpers;
mod scenarios;
