use evmabi::{abi_from_bytecode, AbiEntry, Param, StateMutability};

fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", bytes.iter().map(|b| format!("{b:02x}")).collect::<String>())
}

/// `totalSupply()` style getter: canonical dispatch into a guarded
/// body that only returns, with no storage write.
#[test]
fn view_function_with_guard_and_no_sstore() {
    let mut code = vec![0x63, 0x18, 0x16, 0x0d, 0xdd, 0x14, 0x60, 0x20, 0x57]; // PUSH4 EQ PUSH1 0x20 JUMPI
    code.resize(0x20, 0x00);
    code.extend_from_slice(&[0x5b, 0x34, 0x80, 0x15, 0xf3]); // JUMPDEST CALLVALUE DUP1 ISZERO RETURN
    let hex = to_hex(&code);

    let abi = abi_from_bytecode(&hex).unwrap();
    assert_eq!(abi.len(), 1);
    match &abi[0] {
        AbiEntry::Function(f) => {
            assert_eq!(f.selector, "0x18160ddd");
            assert_eq!(f.state_mutability, StateMutability::View);
            assert!(!f.payable);
            assert!(f.inputs.is_empty());
            assert_eq!(f.outputs, vec![Param { r#type: "bytes" }]);
        }
        other => panic!("expected function, got {other:?}"),
    }
}

/// `transfer(address,uint256)` style call: guarded by the non-payable
/// CALLVALUE check and writing storage.
#[test]
fn nonpayable_function_with_guard_and_sstore() {
    let mut code = vec![0x63, 0xa9, 0x05, 0x9c, 0xbb, 0x14, 0x60, 0x20, 0x57]; // PUSH4 a9059cbb EQ PUSH1 0x20 JUMPI
    code.resize(0x20, 0x00);
    // JUMPDEST CALLVALUE DUP1 ISZERO ... CALLDATALOAD SSTORE STOP
    code.extend_from_slice(&[0x5b, 0x34, 0x80, 0x15, 0x35, 0x55, 0x00]);
    let hex = to_hex(&code);

    let abi = abi_from_bytecode(&hex).unwrap();
    assert_eq!(abi.len(), 1);
    match &abi[0] {
        AbiEntry::Function(f) => {
            assert_eq!(f.selector, "0xa9059cbb");
            assert_eq!(f.state_mutability, StateMutability::NonPayable);
            assert!(!f.payable);
            assert_eq!(f.inputs, vec![Param { r#type: "bytes" }]);
        }
        other => panic!("expected function, got {other:?}"),
    }
}

/// A payable function: no non-payable guard precedes the body, even
/// though it writes storage.
#[test]
fn payable_function_with_sstore_and_no_guard() {
    let mut code = vec![0x63, 0xde, 0xad, 0xbe, 0xef, 0x14, 0x60, 0x20, 0x57];
    code.resize(0x20, 0x00);
    code.extend_from_slice(&[0x5b, 0x55, 0x00]); // JUMPDEST SSTORE STOP
    let hex = to_hex(&code);

    let abi = abi_from_bytecode(&hex).unwrap();
    match &abi[0] {
        AbiEntry::Function(f) => {
            assert!(f.payable);
            assert_eq!(f.state_mutability, StateMutability::Payable);
        }
        other => panic!("expected function, got {other:?}"),
    }
}

/// Fallback dispatch via the zero-selector peephole still synthesizes
/// a function entry.
#[test]
fn fallback_zero_selector_synthesizes_entry() {
    let code = vec![0x15, 0x60, 0x08, 0x57, 0x00, 0x00, 0x00, 0x00, 0x5b, 0xf3]; // ISZERO PUSH1 0x08 JUMPI ... JUMPDEST RETURN
    let hex = to_hex(&code);

    let abi = abi_from_bytecode(&hex).unwrap();
    assert_eq!(abi.len(), 1);
    match &abi[0] {
        AbiEntry::Function(f) => assert_eq!(f.selector, "0x00000000"),
        other => panic!("expected function, got {other:?}"),
    }
}

/// Event topics seen via `PUSHn <topic> LOGx` are reported alongside
/// functions, ordering events after all functions.
#[test]
fn event_topic_is_recovered_alongside_functions() {
    let mut code = vec![0x63, 0x18, 0x16, 0x0d, 0xdd, 0x14, 0x60, 0x20, 0x57];
    code.resize(0x20, 0x00);
    code.push(0x5b); // JUMPDEST
    code.push(0x7f); // PUSH32
    code.extend_from_slice(&[0xcc; 32]);
    code.push(0xa1); // LOG1
    let hex = to_hex(&code);

    let abi = abi_from_bytecode(&hex).unwrap();
    assert_eq!(abi.len(), 2);
    assert!(matches!(&abi[0], AbiEntry::Function(_)));
    match &abi[1] {
        AbiEntry::Event(e) => assert_eq!(e.hash, format!("0x{}", "cc".repeat(32))),
        other => panic!("expected event, got {other:?}"),
    }
}

/// Bytecode with no recognisable selectors or events yields an empty
/// ABI rather than an error.
#[test]
fn bytecode_with_no_recognisable_patterns_yields_empty_abi() {
    let hex = to_hex(&[0x00, 0x00, 0x00]); // STOP STOP STOP
    let abi = abi_from_bytecode(&hex).unwrap();
    assert!(abi.is_empty());
}

#[test]
fn malformed_hex_propagates_as_error() {
    assert!(abi_from_bytecode("not hex").is_err());
}
