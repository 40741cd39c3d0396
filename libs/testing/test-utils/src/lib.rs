//! Shared test utilities for notification crates
//!
//! This crate provides reusable test infrastructure:
//! - `TestUnsend`: local Unsend API stand-in (feature: "unsend")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//!
//! # Features
//!
//! - `unsend` (default): Enables the Unsend API stand-in
//! - `all`: Enables all test infrastructure
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{TestDataBuilder, TestUnsend, TEST_API_KEY};
//!
//! #[tokio::test]
//! async fn my_send_test() {
//!     let unsend = TestUnsend::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_send_test");
//!
//!     unsend.accept(&builder.email_id()).await;
//!     // ... send through an adapter configured with unsend.base_url()
//!     assert_eq!(unsend.request_count().await, 1);
//! }
//! ```

#[cfg(feature = "unsend")]
mod unsend;

#[cfg(feature = "unsend")]
pub use unsend::{EMAILS_PATH, TEST_API_KEY, TestUnsend, unreachable_base_url};

/// Builder for test data with deterministic values
///
/// This ensures tests are reproducible by deriving data from a seed.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_send_email");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Provider email ID for a mocked response
    pub fn email_id(&self) -> String {
        format!("em_{:016x}", self.seed)
    }

    /// Email address on the reserved example domain
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(42);
    /// assert_eq!(builder.address("user"), "user-42@example.com");
    /// ```
    pub fn address(&self, local: &str) -> String {
        format!("{}-{}@example.com", local, self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.email_id(), builder2.email_id());
        assert_eq!(builder1.address("user"), builder2.address("user"));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.email_id(), builder2.email_id());
    }

    #[test]
    fn test_email_id_format() {
        assert_eq!(TestDataBuilder::new(255).email_id(), "em_00000000000000ff");
    }
}
