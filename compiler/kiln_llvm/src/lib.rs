//! LLVM backend for kiln.
//!
//! Implements the [`kiln_ir`] backend traits over a real LLVM module through
//! inkwell, so intrinsic calls resolved by `kiln_intrinsics` land in LLVM IR
//! exactly as they do in the in-memory [`kiln_ir::Module`].
//!
//! Follows Rust's `rustc_codegen_llvm` split:
//! - [`SimpleCx`]: the LLVM context, the module and type lowering
//! - [`LlvmBuilder`]: an ID-based instruction builder over a `SimpleCx`
//!
//! LLVM 17 pointers are opaque, so every value handed out by the builder is
//! stored together with its kiln [`Type`](kiln_types::Type). That keeps
//! pointee types available to intrinsic matching, which needs them to tell
//! `i32*` from `float*`.

mod builder;
mod context;
mod value_id;

pub use builder::LlvmBuilder;
pub use context::SimpleCx;
pub use value_id::{BlockId, FunctionId, ValueId};
