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

use crate::disassembler::{disassemble, Program};
use crate::error::Error;
use crate::opcode;
use crate::tags::collapse_tags;

/// The opaque parameter placeholder this crate ever emits: it cannot
/// decode parameter types beyond "some bytes were involved" (§1,
/// Non-goals).
pub const BYTES_PLACEHOLDER: &str = "bytes";

/// State mutability, restricted to the three variants this engine can
/// actually infer.  `pure` is intentionally never produced (§9).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateMutability {
    Payable,
    View,
    NonPayable,
}

impl StateMutability {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateMutability::Payable => "payable",
            StateMutability::View => "view",
            StateMutability::NonPayable => "nonpayable",
        }
    }
}

/// A single opaque `{type: "bytes"}` parameter placeholder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub r#type: &'static str,
}

/// A recovered function entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionAbi {
    pub selector: String,
    pub payable: bool,
    pub state_mutability: StateMutability,
    pub inputs: Vec<Param>,
    pub outputs: Vec<Param>,
}

/// A recovered event entry.  Only the topic hash is known; there is
/// no way to recover the human-readable signature from bytecode
/// alone (that is the out-of-scope preimage lookup in §1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventAbi {
    pub hash: String,
}

/// One entry of the recovered ABI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiEntry {
    Function(FunctionAbi),
    Event(EventAbi),
}

impl AbiEntry {
    pub fn type_name(&self) -> &'static str {
        match self {
            AbiEntry::Function(_) => "function",
            AbiEntry::Event(_) => "event",
        }
    }
}

/// Recover an approximate ABI directly from a hex-encoded bytecode
/// string.  This is the primary entry point of the crate.
pub fn abi_from_bytecode(code: &str) -> Result<Vec<AbiEntry>, Error> {
    let program = disassemble(code)?;
    Ok(synthesize(&program))
}

/// Synthesize ABI entries from an already-disassembled `Program`.
/// Exposed for callers that drive disassembly themselves (e.g. to
/// inspect the `Program` before deciding whether to synthesize).
pub fn synthesize(program: &Program) -> Vec<AbiEntry> {
    let mut entries = Vec::with_capacity(program.jumps.len() + program.event_candidates.len());

    for (selector, dest) in program.jumps.iter() {
        let Ok(offset) = usize::try_from(dest) else {
            continue;
        };
        let Some(function) = program.dests.get(&offset) else {
            continue;
        };
        let tags = collapse_tags(function, &program.dests);
        let payable = !program.not_payable.contains(&offset);

        let outputs = if tags.contains(&opcode::RETURN) {
            vec![Param { r#type: BYTES_PLACEHOLDER }]
        } else {
            Vec::new()
        };
        let inputs = if tags.contains(&opcode::CALLDATALOAD)
            || tags.contains(&opcode::CALLDATASIZE)
            || tags.contains(&opcode::CALLDATACOPY)
        {
            vec![Param { r#type: BYTES_PLACEHOLDER }]
        } else {
            Vec::new()
        };
        let state_mutability = if payable {
            StateMutability::Payable
        } else if !tags.contains(&opcode::SSTORE) {
            StateMutability::View
        } else {
            StateMutability::NonPayable
        };

        entries.push(AbiEntry::Function(FunctionAbi {
            selector: selector.to_string(),
            payable,
            state_mutability,
            inputs,
            outputs,
        }));
    }

    for topic in &program.event_candidates {
        entries.push(AbiEntry::Event(EventAbi { hash: topic.clone() }));
    }

    entries
}
