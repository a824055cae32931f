/// Opcode constants for the subset of the EVM instruction set this
/// crate cares about, along with the small predicates used to drive
/// the scanner (`is_push`, `is_log`, `push_width`).
pub mod opcode;
/// Conversion between raw bytes and `0x`-prefixed hex strings.
pub mod hex;
/// Errors that can escape the public API.
pub mod error;
/// The bounded look-behind instruction cursor over a byte sequence.
pub mod cursor;
/// The single-pass scanner that turns a byte sequence into a
/// `Program` summary: jump destinations, the selector dispatch table,
/// non-payable guards and event topic candidates.
pub mod disassembler;
/// Transitive union of interesting opcode tags across a function's
/// reachable jump targets.
pub mod tags;
/// Maps a disassembled `Program` onto a list of ABI records.
pub mod abi;

pub use crate::abi::{abi_from_bytecode, AbiEntry, EventAbi, FunctionAbi, Param, StateMutability};
pub use crate::disassembler::{disassemble, Function, Program, SelectorTable};
pub use crate::error::Error;
pub use crate::hex::{FromHexString, ToHexString};
