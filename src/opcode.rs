// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Opcode constants and predicates for the subset of the EVM
//! instruction set the disassembler needs to recognise.  Values match
//! the Ethereum Yellow Paper encoding.

// 0s: Stop and Arithmetic Operations
pub const STOP: u8 = 0x00;
// 10s: Comparison & Bitwise Logic Operations
pub const EQ: u8 = 0x14;
pub const ISZERO: u8 = 0x15;
// 30s: Environmental Information
pub const CALLVALUE: u8 = 0x34;
pub const CALLDATALOAD: u8 = 0x35;
pub const CALLDATASIZE: u8 = 0x36;
pub const CALLDATACOPY: u8 = 0x37;
// 50s: Stack, Memory, Storage and Flow Operations
pub const SLOAD: u8 = 0x54;
pub const SSTORE: u8 = 0x55;
pub const JUMP: u8 = 0x56;
pub const JUMPI: u8 = 0x57;
pub const JUMPDEST: u8 = 0x5b;
// 60s & 70s: Push Operations
pub const PUSH1: u8 = 0x60;
pub const PUSH32: u8 = 0x7f;
// 80s: Duplication Operations
pub const DUP1: u8 = 0x80;
// a0s: Logging Operations
pub const LOG1: u8 = 0xa1;
pub const LOG4: u8 = 0xa4;
// f0s: System Operations
pub const RETURN: u8 = 0xf3;

/// Width (in bytes) of the immediate operand a `PUSHn` instruction
/// consumes.  Zero for every other opcode.
pub fn push_width(op: u8) -> usize {
    if (PUSH1..=PUSH32).contains(&op) {
        (op - (PUSH1 - 1)) as usize
    } else {
        0
    }
}

/// True for `PUSH1`..`PUSH32`.
pub fn is_push(op: u8) -> bool {
    (PUSH1..=PUSH32).contains(&op)
}

/// True for `LOG1`..`LOG4`.  `LOG0` is deliberately excluded: it can
/// never carry an event topic, so it is uninteresting to the
/// synthesizer.
pub fn is_log(op: u8) -> bool {
    (LOG1..=LOG4).contains(&op)
}

/// The opcodes whose presence in a function's reachable blocks drives
/// ABI synthesis: they mark visible calldata reads, storage writes,
/// and the two forms of "this path produces output".
pub fn is_interesting(op: u8) -> bool {
    matches!(
        op,
        STOP | RETURN | CALLDATALOAD | CALLDATASIZE | CALLDATACOPY | SLOAD | SSTORE
    )
}
