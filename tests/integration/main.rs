//! HTTP-level tests driving the full router against in-memory stores.

mod folder_test;
mod helpers;
mod video_test;
