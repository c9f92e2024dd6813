//! Backend abstraction and in-memory compilation unit.
//!
//! The intrinsic engine in `kiln_intrinsics` needs exactly three things from
//! a code-generation backend: look up or declare a named function in the
//! current unit, emit a call, and report the concrete type of a value.
//! Those needs are the traits in [`traits`]. Any backend implementing them
//! can host intrinsic calls; `kiln_llvm` does so over a real LLVM module.
//!
//! This crate also ships [`Module`] and [`IrBuilder`], a small arena-backed
//! compilation unit implementing the same traits. It owns every function,
//! block and value it creates and renders itself as LLVM-style text, which
//! makes emitted IR easy to assert on without an LLVM installation.
//!
//! # Key Types
//!
//! - [`Module`]: the compilation unit and its symbol table
//! - [`IrBuilder`]: instruction builder positioned inside a `Module`
//! - [`ValueId`], [`FunctionId`], [`BlockId`]: `Copy` handles into the arena

mod attrs;
pub mod builder;
mod error;
pub mod module;
mod printer;
pub mod traits;
mod value_id;

pub use attrs::{FnAttrs, Linkage};
pub use builder::IrBuilder;
pub use error::IrError;
pub use module::{Block, Function, Instruction, Module, ValueData, ValueKind};
pub use traits::{BackendTypes, BuilderMethods, DeclareMethods};
pub use value_id::{BlockId, FunctionId, ValueId};
