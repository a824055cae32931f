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

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::disassembler::Function;

/// Compute the transitive union of `f`'s own interesting-opcode tags
/// with those of every `Function` reachable through `f.jumps`.
///
/// Traversal is cycle-safe: a visited set keyed by `JUMPDEST` offset
/// ensures each block contributes its tags at most once, so a jump
/// graph with cycles (or a block that jumps back to itself) still
/// terminates.  Candidate jump targets that aren't registered
/// `JUMPDEST`s in `dests` (invalid destinations, or offsets the
/// scanner could only guess at) are simply skipped.
pub fn collapse_tags(f: &Function, dests: &BTreeMap<usize, Function>) -> BTreeSet<u8> {
    let mut visited = BTreeSet::new();
    let mut tags = BTreeSet::new();
    visited.insert(f.start);
    tags.extend(f.op_tags.iter().copied());

    let mut pending: Vec<usize> = candidate_targets(f, &visited, dests);

    while let Some(target) = pending.pop() {
        if !visited.insert(target) {
            continue;
        }
        if let Some(g) = dests.get(&target) {
            tags.extend(g.op_tags.iter().copied());
            pending.extend(candidate_targets(g, &visited, dests));
        }
    }

    tags
}

/// Candidate jump targets of `f` that are both valid `JUMPDEST`s and
/// not yet visited.
fn candidate_targets(
    f: &Function,
    visited: &BTreeSet<usize>,
    dests: &BTreeMap<usize, Function>,
) -> Vec<usize> {
    f.jumps
        .iter()
        .filter_map(|&j| usize::try_from(j).ok())
        .filter(|offset| !visited.contains(offset) && dests.contains_key(offset))
        .collect()
}
