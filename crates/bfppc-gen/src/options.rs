//! Generator-tunable constants (§4.3 prologue/epilogue), threaded in from
//! the driver rather than hardcoded, so CLI overrides never have to reach
//! into the core crates.

/// Stack-frame sizing for the prologue/epilogue pair emitted per label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Bytes of stack headroom reserved below the saved frame pointer.
    pub allocate: u32,
    /// Bytes the BF tape cursor sits below the saved frame pointer.
    /// The `subq $base_offset, %rbp` is omitted entirely when this is 0.
    pub base_offset: i32,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            allocate: 16384,
            base_offset: 128,
        }
    }
}
