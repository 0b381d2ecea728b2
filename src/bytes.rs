//! Joining mixed values into one byte buffer.

/// One piece of a [`concat_bytes`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment<'a> {
    Bytes(&'a [u8]),
    Text(&'a str),
    Byte(u8),
    Char(char),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
}

impl Fragment<'_> {
    fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Fragment::Bytes(b) => out.extend_from_slice(b),
            Fragment::Text(s) => out.extend_from_slice(s.as_bytes()),
            Fragment::Byte(b) => out.push(*b),
            Fragment::Char(c) => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            Fragment::Int(n) => out.extend_from_slice(n.to_string().as_bytes()),
            Fragment::Uint(n) => out.extend_from_slice(n.to_string().as_bytes()),
            Fragment::Float(n) => out.extend_from_slice(n.to_string().as_bytes()),
            Fragment::Bool(b) => out.extend_from_slice(if *b { b"true" } else { b"false" }),
        }
    }
}

impl<'a> From<&'a [u8]> for Fragment<'a> {
    fn from(b: &'a [u8]) -> Self {
        Fragment::Bytes(b)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Fragment<'a> {
    fn from(b: &'a [u8; N]) -> Self {
        Fragment::Bytes(b)
    }
}

impl<'a> From<&'a Vec<u8>> for Fragment<'a> {
    fn from(b: &'a Vec<u8>) -> Self {
        Fragment::Bytes(b)
    }
}

impl<'a> From<&'a str> for Fragment<'a> {
    fn from(s: &'a str) -> Self {
        Fragment::Text(s)
    }
}

impl<'a> From<&'a String> for Fragment<'a> {
    fn from(s: &'a String) -> Self {
        Fragment::Text(s)
    }
}

impl From<u8> for Fragment<'_> {
    fn from(b: u8) -> Self {
        Fragment::Byte(b)
    }
}

impl From<char> for Fragment<'_> {
    fn from(c: char) -> Self {
        Fragment::Char(c)
    }
}

impl From<i32> for Fragment<'_> {
    fn from(n: i32) -> Self {
        Fragment::Int(n.into())
    }
}

impl From<i64> for Fragment<'_> {
    fn from(n: i64) -> Self {
        Fragment::Int(n)
    }
}

impl From<u32> for Fragment<'_> {
    fn from(n: u32) -> Self {
        Fragment::Uint(n.into())
    }
}

impl From<u64> for Fragment<'_> {
    fn from(n: u64) -> Self {
        Fragment::Uint(n)
    }
}

impl From<usize> for Fragment<'_> {
    fn from(n: usize) -> Self {
        Fragment::Uint(n as u64)
    }
}

impl From<f64> for Fragment<'_> {
    fn from(n: f64) -> Self {
        Fragment::Float(n)
    }
}

impl From<bool> for Fragment<'_> {
    fn from(b: bool) -> Self {
        Fragment::Bool(b)
    }
}

/// Concatenate fragments in order.
pub fn concat_bytes(values: &[Fragment<'_>]) -> Vec<u8> {
    let mut out = Vec::new();
    for value in values {
        value.write_to(&mut out);
    }
    out
}

/// [`concat_bytes`] with each argument converted through `Fragment::from`.
///
/// ```
/// let id = 42u32;
/// let out = regcache::join_bytes!("user-", id, b':', b"raw", true);
/// assert_eq!(out, b"user-42:rawtrue");
/// ```
#[macro_export]
macro_rules! join_bytes {
    ($($value:expr),* $(,)?) => {
        $crate::bytes::concat_bytes(&[$($crate::bytes::Fragment::from($value)),*])
    };
}
