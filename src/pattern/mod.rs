//! Pattern module - the dCBOR pattern-matching engine.
//!
//! A [`Pattern`](pattern_impl::Pattern) is built from three families of leaf
//! and combinator types: [`value`] patterns match a single CBOR scalar,
//! [`structure`] patterns match arrays, maps, and tagged values, and
//! [`meta`] patterns combine other patterns (`and`, `or`, `not`, `repeat`,
//! `capture`, `search`, `sequence`). Matching is available through two
//! independent engines: a direct tree-walking matcher (the default
//! [`Matcher`] implementation) and a compiled bytecode [`vm`].

mod array_backtracker;
mod matcher;
mod pattern_impl;
mod vm;

pub mod meta;
pub mod structure;
pub mod value;

pub use matcher::{Matcher, Path, compile_as_atomic};
pub use meta::MetaPattern;
pub use pattern_impl::Pattern;
pub use structure::StructurePattern;
pub use value::ValuePattern;
pub use vm::{Axis, Instr, Program};
