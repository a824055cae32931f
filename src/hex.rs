use std::fmt::Write;

use crate::error::Error;

/// A simple trait allowing something to be converted into a hex
/// string.
pub trait ToHexString {
    fn to_hex_string(&self) -> String;
}

/// A simple trait allowing something to be converted from a hex
/// string.
pub trait FromHexString {
    fn from_hex_string(&self) -> Result<Vec<u8>, Error>;
}

/// A default implementation for byte slices.
impl ToHexString for [u8] {
    fn to_hex_string(&self) -> String {
        let mut hexstr = String::with_capacity(2 + (2 * self.len()));
        write!(hexstr, "0x").unwrap();
        for b in self {
            write!(hexstr, "{:02x}", b).unwrap();
        }
        hexstr
    }
}

/// A default implementation for string slices.  Unlike a permissive
/// decoder which pads an odd leading nibble, an odd number of digits
/// here is treated as malformed input (see §6 of the core spec).
impl FromHexString for str {
    fn from_hex_string(&self) -> Result<Vec<u8>, Error> {
        let slice = if self.len() >= 2 && &self[0..2] == "0x" {
            &self[2..]
        } else {
            self
        };
        if slice.len() % 2 != 0 {
            return Err(Error::MalformedInput);
        }
        let mut bytes = Vec::with_capacity(slice.len() / 2);
        for i in (0..slice.len()).step_by(2) {
            let byte = u8::from_str_radix(&slice[i..i + 2], 16).map_err(|_| Error::MalformedInput)?;
            bytes.push(byte);
        }
        Ok(bytes)
    }
}
