/// Blind Mint - commit-reveal minting for non-fungible tokens
///
/// This is the root crate that provides workspace-level documentation.
/// Actual implementation is in the subcrates:
/// - `blind-mint-core`: value codec, commitment hasher and reveal registry
/// - `blind-mint-cli`: command-line front end over the core

/// Returns the version of the package.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
