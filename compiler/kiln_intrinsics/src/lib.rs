//! Generic intrinsic resolution for kiln.
//!
//! Lets a caller invoke an overloaded, parametrically typed intrinsic by
//! supplying only argument values. For each call site the engine:
//!
//! 1. matches the argument types against a template signature (or picks the
//!    one member of an overload family that accepts them),
//! 2. fills the template's holes to get a concrete signature,
//! 3. mangles a deterministic symbol name for that instantiation,
//! 4. declares it once per compilation unit, and
//! 5. emits the call.
//!
//! Steps 1 to 3 are pure functions over [`kiln_types`]. Only the last two
//! touch the unit, through the [`kiln_ir`] backend traits, so the engine
//! runs unchanged over the in-memory [`kiln_ir::Module`] or a real LLVM
//! module.
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=kiln_intrinsics=debug`: log declarations and emitted calls
//!   (after [`init_tracing`]).
//! - `RUST_LOG=kiln_intrinsics=trace`: also log cache hits and rejected
//!   arguments.
//! - `KILN_STRICT_OVERLOADS=1`: fail on ambiguous families, read by
//!   [`ResolveConfig::from_env`].
//! - `KILN_CHECK_INTRINSIC_ARGS=0|1`: override argument checking, also read
//!   by [`ResolveConfig::from_env`].

mod config;
mod declare;
mod def;
mod emit;
mod error;
mod instantiate;
pub mod mangle;
mod matcher;
mod select;
mod subst;
pub mod table;

use std::sync::Once;

pub use config::{OverloadPolicy, ResolveConfig, CHECK_ARGUMENTS_ENV, STRICT_OVERLOADS_ENV};
pub use declare::{declare_intrinsic, declare_with_overloads};
pub use def::{Intrinsic, IntrinsicDef, IntrinsicFamily};
pub use emit::{emit_intrinsic_call, resolve, IntrinsicCallExt};
pub use error::{MatchFailure, ResolveError};
pub use instantiate::{instantiate, instantiate_with_overloads, ResolvedIntrinsic};
pub use matcher::{capture_positional, match_signature, try_match};
pub use select::select;
pub use subst::{Binding, Extent, Substitution};
pub use table::{IntrinsicTable, TableEntry};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing from `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
