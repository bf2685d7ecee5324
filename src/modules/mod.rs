/// An interface for mocking sentinel nodes.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
