//! Redirect tracking and not-found classification
//!
//! The catalog answers requests for unknown ids by redirecting to a generic
//! landing page instead of returning 404. The fetcher follows redirects by
//! hand and records every hop, so "was this response reached through a
//! redirect" is a direct property of the fetched page.

use url::Url;

/// Maximum number of redirect hops followed for a single request
pub const MAX_REDIRECTS: usize = 10;

/// URLs left behind while following redirects, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectChain {
    hops: Vec<Url>,
}

impl RedirectChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `from` answered with a redirect
    pub fn push(&mut self, from: Url) {
        self.hops.push(from);
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn hops(&self) -> &[Url] {
        &self.hops
    }

    /// True once another hop would exceed [`MAX_REDIRECTS`]
    pub fn is_exhausted(&self) -> bool {
        self.hops.len() >= MAX_REDIRECTS
    }

    /// True if `url` was already visited in this chain
    pub fn contains(&self, url: &Url) -> bool {
        self.hops.iter().any(|hop| hop == url)
    }
}

/// Classifies a response as "book not found"
///
/// A response is not-found if and only if at least one redirect was
/// followed to reach it. Body and headers are not consulted.
pub fn is_not_found(chain: &RedirectChain) -> bool {
    !chain.is_empty()
}
