
use std::time::Duration;

use maplerank::server::service::retry::RetryPolicy;
use maplerank_test_utils::prelude::*;

/// Same attempt count as the production policy with millisecond backoff.
pub const FAST_RETRY: RetryPolicy = RetryPolicy::new(3, Duration::from_millis(1), 2);
