//! Reader configuration.
//!
//! The defaults follow the ZIP format as written by common tools. The
//! [`ReadOptions::compat`] preset computes the same offsets and payloads as
//! minimal fixed-offset readers, with two differences: the local header at
//! offset 0 is only read once the Central Directory has been walked, and not
//! at all for an archive without entries. A bare 22-byte archive therefore
//! reads as empty instead of failing on a missing local header.

/// How the End of Central Directory record is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EocdSearch {
    /// Only look at the final 22 bytes; an archive comment makes the read fail.
    FixedTail,
    /// Try the final 22 bytes, then scan backwards through the comment window.
    #[default]
    Backward,
}

/// Where the local header extra field length comes from when computing data offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraFieldPolicy {
    /// Read the local header at offset 0 once and reuse its extra field length
    /// for every entry. Only correct when all local headers carry equally
    /// sized extra fields.
    FirstLocalHeader,
    /// Read each entry's own local header.
    #[default]
    PerEntry,
}

/// How an entry's compression method selects the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodDispatch {
    /// Inflate every payload as raw DEFLATE regardless of the header.
    AssumeDeflate,
    /// Copy STORED entries, inflate DEFLATE entries, reject anything else.
    #[default]
    FromHeader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadOptions {
    pub eocd_search: EocdSearch,
    pub extra_field_policy: ExtraFieldPolicy,
    pub method_dispatch: MethodDispatch,
}

impl ReadOptions {
    /// Fixed-tail EOCD, first-header extra length, DEFLATE for everything.
    ///
    /// See the module docs for how this differs from fixed-offset readers.
    pub fn compat() -> Self {
        Self {
            eocd_search: EocdSearch::FixedTail,
            extra_field_policy: ExtraFieldPolicy::FirstLocalHeader,
            method_dispatch: MethodDispatch::AssumeDeflate,
        }
    }

    pub fn with_eocd_search(mut self, eocd_search: EocdSearch) -> Self {
        self.eocd_search = eocd_search;
        self
    }

    pub fn with_extra_field_policy(mut self, policy: ExtraFieldPolicy) -> Self {
        self.extra_field_policy = policy;
        self
    }

    pub fn with_method_dispatch(mut self, dispatch: MethodDispatch) -> Self {
        self.method_dispatch = dispatch;
        self
    }
}
