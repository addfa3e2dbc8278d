//! # Tracing Setup
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered
//! by `RUST_LOG`.
//!
//! ```bash
//! RUST_LOG=info cargo run     # one line per request outcome
//! RUST_LOG=debug cargo run    # request payloads as well
//! ```
//!
//! At `info` a checkout looks like:
//!
//! ```text
//! INFO Order placed order_id=order_1 table=1 total=7.0
//! INFO ok op="PlaceOrder"
//! ```

/// Install the global subscriber. Call once, at program start.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
