use evmabi::disassemble;
use evmabi::Error;

fn hex_of(bytes: &[u8]) -> String {
    format!("0x{}", bytes.iter().map(|b| format!("{b:02x}")).collect::<String>())
}

#[test]
fn empty_bytecode_has_empty_program() {
    let p = disassemble("0x").unwrap();
    assert!(p.dests.is_empty());
    assert!(p.jumps.is_empty());
    assert!(p.not_payable.is_empty());
    assert!(p.event_candidates.is_empty());
}

#[test]
fn accepts_hex_without_0x_prefix() {
    // JUMPDEST CALLVALUE RETURN, no leading "0x".
    let p = disassemble("5b34f3").unwrap();
    assert_eq!(p.dests.len(), 1);
}

#[test]
fn malformed_hex_is_rejected() {
    assert_eq!(disassemble("0xnotHex").unwrap_err(), Error::MalformedInput);
    assert_eq!(disassemble("0xabc").unwrap_err(), Error::MalformedInput);
}

#[test]
fn non_payable_guard_is_recorded_on_its_jumpdest() {
    // JUMPDEST CALLVALUE DUP1 ISZERO PUSH1 0x08 JUMPI ... JUMPDEST STOP
    let code = [0x5b, 0x34, 0x80, 0x15, 0x60, 0x08, 0x57, 0x00, 0x5b, 0x00];
    let p = disassemble(&hex_of(&code)).unwrap();
    assert!(p.not_payable.contains(&0));
    assert!(!p.not_payable.contains(&8));
}

#[test]
fn selector_dispatch_table_accumulates_multiple_entries() {
    // Two canonical dispatch patterns back to back, both inside the
    // still-open jump table, followed by the CALLDATASIZE-guarded
    // JUMPDEST that ends it.
    let code = [
        // PUSH4 0xaaaaaaaa EQ PUSH1 0x20 JUMPI
        0x63, 0xaa, 0xaa, 0xaa, 0xaa, 0x14, 0x60, 0x20, 0x57,
        // PUSH4 0xbbbbbbbb EQ PUSH1 0x30 JUMPI
        0x63, 0xbb, 0xbb, 0xbb, 0xbb, 0x14, 0x60, 0x30, 0x57,
    ];
    let p = disassemble(&hex_of(&code)).unwrap();
    assert_eq!(p.jumps.get("0xaaaaaaaa"), Some(0x20));
    assert_eq!(p.jumps.get("0xbbbbbbbb"), Some(0x30));
    assert_eq!(p.jumps.len(), 2);
}

#[test]
fn duplicate_selector_keeps_position_but_overwrites_destination() {
    let code = [
        // PUSH4 0xaaaaaaaa EQ PUSH1 0x20 JUMPI
        0x63, 0xaa, 0xaa, 0xaa, 0xaa, 0x14, 0x60, 0x20, 0x57,
        // PUSH4 0xaaaaaaaa EQ PUSH1 0x40 JUMPI  (same selector, later dest)
        0x63, 0xaa, 0xaa, 0xaa, 0xaa, 0x14, 0x60, 0x40, 0x57,
    ];
    let p = disassemble(&hex_of(&code)).unwrap();
    assert_eq!(p.jumps.len(), 1);
    assert_eq!(p.jumps.get("0xaaaaaaaa"), Some(0x40));
}

#[test]
fn truncated_push32_halts_without_panicking() {
    // PUSH32 followed by only 4 bytes of operand.
    let code = [0x7f, 0x01, 0x02, 0x03, 0x04];
    let p = disassemble(&hex_of(&code)).unwrap();
    assert!(p.event_candidates.is_empty());
}
