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

use std::collections::{BTreeMap, BTreeSet, HashMap};

use ruint::aliases::U256;

use crate::cursor::Cursor;
use crate::error::Error;
use crate::hex::{FromHexString, ToHexString};
use crate::opcode;

/// Look-behind depth the scanner drives the cursor with.  Four slots
/// are enough to recognise every pattern in R4/R7 (the widest is the
/// four-instruction canonical selector dispatch).
const LOOKBEHIND: usize = 4;

// ============================================================================
// Function record
// ============================================================================

/// One basic block, opened by a `JUMPDEST` and closed by the next
/// `JUMPDEST` (or end of code).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Function {
    /// Byte offset of the opening `JUMPDEST`.
    pub start: usize,
    /// Instruction index of the opening `JUMPDEST`.
    pub step: usize,
    /// Interesting opcodes (§4.1) observed within this block.
    pub op_tags: BTreeSet<u8>,
    /// Candidate destination byte offsets this block may transfer
    /// control to, in the order they were observed.  Not every
    /// candidate need be a valid `JUMPDEST`.
    pub jumps: Vec<u128>,
    /// Byte offset of the last instruction in the block, if the next
    /// `JUMPDEST` (or end of code) has been observed.
    pub end: Option<usize>,
}

impl Function {
    fn new(start: usize, step: usize) -> Self {
        Function {
            start,
            step,
            op_tags: BTreeSet::new(),
            jumps: Vec::new(),
            end: None,
        }
    }
}

// ============================================================================
// Selector table
// ============================================================================

/// An insertion-ordered map from 4-byte selector (as a `0x`-prefixed
/// hex string) to destination byte offset.  Re-inserting an existing
/// selector overwrites its destination but keeps its original
/// position, matching how a selector dispatch table is normally only
/// ever appended to once per selector.
#[derive(Clone, Debug, Default)]
pub struct SelectorTable {
    order: Vec<String>,
    values: HashMap<String, u128>,
}

impl SelectorTable {
    fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, selector: String, dest: u128) {
        if !self.values.contains_key(&selector) {
            self.order.push(selector.clone());
        }
        self.values.insert(selector, dest);
    }

    /// The destination registered for `selector`, if any.
    pub fn get(&self, selector: &str) -> Option<u128> {
        self.values.get(selector).copied()
    }

    /// Number of distinct selectors registered.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate selectors in the order they were first registered.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u128)> {
        self.order.iter().map(move |k| (k.as_str(), self.values[k]))
    }
}

// ============================================================================
// Program summary
// ============================================================================

/// The result of a single-pass disassembly: every basic block keyed
/// by its `JUMPDEST` offset, the selector dispatch table, the set of
/// non-payable-guarded blocks, and any event topic candidates seen.
#[derive(Clone, Debug, Default)]
pub struct Program {
    pub dests: BTreeMap<usize, Function>,
    pub jumps: SelectorTable,
    pub not_payable: BTreeSet<usize>,
    pub event_candidates: Vec<String>,
}

/// Recover a `Program` summary from a hex-encoded bytecode string.
pub fn disassemble(code: &str) -> Result<Program, Error> {
    let bytes = code.from_hex_string()?;
    Ok(scan(&bytes))
}

/// Run the single-pass scan directly over raw bytes.  Exposed
/// alongside `disassemble` for callers (and tests) that already hold
/// decoded bytecode.
pub fn scan(bytes: &[u8]) -> Program {
    let mut cursor = Cursor::new(bytes, LOOKBEHIND);
    let mut dests: BTreeMap<usize, Function> = BTreeMap::new();
    let mut jumps = SelectorTable::new();
    let mut not_payable = BTreeSet::new();
    let mut event_candidates = Vec::new();

    let mut current_start: Option<usize> = None;
    let mut in_jump_table = true;
    let mut last_push32: Vec<u8> = Vec::new();

    let max_offset: u128 = (bytes.len() / 2) as u128;
    let max_offset_len = min_be_len(max_offset);
    let mut min_offset: u128 = 0;

    while cursor.has_more() {
        let op = cursor.next();
        let pos = cursor.pos() as usize;
        let step = cursor.step() as usize;

        // R1: PUSH32 capture.
        if op == opcode::PUSH32 {
            last_push32 = cursor.value().to_vec();
            continue;
        }

        // R2: LOG with a preceding PUSH32.
        if opcode::is_log(op) && !last_push32.is_empty() {
            event_candidates.push(last_push32.to_hex_string());
            continue;
        }

        // R3: JUMPDEST opens a new basic block.
        if op == opcode::JUMPDEST {
            if let Some(start) = current_start {
                if let Some(f) = dests.get_mut(&start) {
                    f.end = Some(pos.saturating_sub(1));
                }
            }
            dests.insert(pos, Function::new(pos, step));
            current_start = Some(pos);

            if bytes.get(pos + 1) == Some(&opcode::CALLVALUE)
                && bytes.get(pos + 2) == Some(&opcode::DUP1)
                && bytes.get(pos + 3) == Some(&opcode::ISZERO)
            {
                not_payable.insert(pos);
            }
            if in_jump_table && bytes.get(pos + 1) == Some(&opcode::CALLDATASIZE) {
                log::trace!("jump table ends at step {step}");
                in_jump_table = false;
                min_offset = (step + 1) as u128;
            }
            continue;
        }

        // R4: intra-function branch to a statically-pushed target.
        if op == opcode::JUMP || op == opcode::JUMPI {
            if let Ok(prev) = cursor.at(-2) {
                if opcode::is_push(prev) {
                    if let Ok(target) = cursor.value_at(-2) {
                        let dest = parse_offset(target);
                        if let Some(start) = current_start {
                            if let Some(f) = dests.get_mut(&start) {
                                f.jumps.push(dest);
                            }
                        }
                    }
                }
            }
        }

        // R5: opcode tagging.
        if opcode::is_interesting(op) {
            if let Some(start) = current_start {
                if let Some(f) = dests.get_mut(&start) {
                    f.op_tags.insert(op);
                }
            }
        }

        // R6: dynamic-jump candidate collection, outside the jump table.
        if !in_jump_table && opcode::is_push(op) {
            let value = cursor.value();
            if value.len() <= max_offset_len {
                let candidate = parse_offset(value);
                if candidate >= min_offset && candidate <= max_offset {
                    log::trace!("accepted dynamic jump candidate {candidate} at step {step}");
                    if let Some(start) = current_start {
                        if let Some(f) = dests.get_mut(&start) {
                            f.jumps.push(candidate);
                        }
                    }
                } else {
                    log::trace!("discarded dynamic jump candidate {candidate} at step {step} (out of range)");
                }
            } else {
                log::trace!("discarded dynamic jump candidate at step {step} ({} bytes wide)", value.len());
            }
            continue;
        }

        // R7: selector detection, only while still inside the jump table.
        if in_jump_table {
            try_register_selector(&cursor, &mut jumps);
        }
    }

    Program {
        dests,
        jumps,
        not_payable,
        event_candidates,
    }
}

/// Attempt to recognise one of the two selector-dispatch peepholes at
/// the current cursor position, registering a selector on success.
/// Silently does nothing if neither pattern matches, including when a
/// `BufferUnderflow` occurs because fewer than four instructions have
/// been decoded yet.
fn try_register_selector(cursor: &Cursor, jumps: &mut SelectorTable) {
    if cursor.at(-1) != Ok(opcode::JUMPI) {
        return;
    }
    let at2 = cursor.at(-2);
    let at3 = cursor.at(-3);
    let at4 = cursor.at(-4);

    // Pattern A: PUSHn <selector> EQ PUSHm <dest> JUMPI
    if let (Ok(a2), Ok(a3), Ok(a4)) = (at2, at3, at4) {
        if opcode::is_push(a2) && a3 == opcode::EQ && opcode::is_push(a4) {
            if let (Ok(sel_bytes), Ok(dest_bytes)) = (cursor.value_at(-4), cursor.value_at(-2)) {
                let selector = selector_hex(sel_bytes);
                let dest = parse_offset(dest_bytes);
                log::trace!("registered selector {selector} -> {dest}");
                jumps.insert(selector, dest);
                return;
            }
        }
    }

    // Pattern B: ISZERO PUSHm <dest> JUMPI (zero-selector peephole)
    if let (Ok(a2), Ok(a3)) = (at2, at3) {
        if opcode::is_push(a2) && a3 == opcode::ISZERO {
            if let Ok(dest_bytes) = cursor.value_at(-2) {
                let dest = parse_offset(dest_bytes);
                log::trace!("registered zero selector -> {dest}");
                jumps.insert("0x00000000".to_string(), dest);
            }
        }
    }
}

/// Render a selector operand as a lower-case `0x` + 8 hex digit
/// string.  Shorter operands are left-padded with zero bytes;
/// operands wider than 4 bytes are truncated to their least
/// significant 4 bytes (the EVM word the `EQ` actually compares
/// against is always 32 bytes; only the low 4 bytes are meaningful
/// for a selector).
fn selector_hex(bytes: &[u8]) -> String {
    let mut buf = [0u8; 4];
    let take = bytes.len().min(4);
    let src = &bytes[bytes.len() - take..];
    buf[4 - take..].copy_from_slice(src);
    buf.to_hex_string()
}

/// Interpret a push operand as a big-endian unsigned integer.
/// Operands wider than 128 bits saturate to `u128::MAX`, which can
/// never be a plausible in-bounds destination and so is always
/// discarded by the bounds checks in R6/ABI synthesis.
fn parse_offset(bytes: &[u8]) -> u128 {
    match U256::try_from_be_slice(bytes) {
        Some(v) => v.checked_to::<u128>().unwrap_or(u128::MAX),
        None => u128::MAX,
    }
}

/// The minimum number of bytes needed to hold `v` in a big-endian
/// representation (at least 1).
fn min_be_len(v: u128) -> usize {
    if v == 0 {
        1
    } else {
        ((128 - v.leading_zeros() as usize) + 7) / 8
    }
}
