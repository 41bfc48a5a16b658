/// Networking module
///
/// One concern only: the startup batch fetch of cat images (fetch.rs).

pub mod fetch;
