use tracing::trace;

use crate::error::{InvalidData, Result};

/// Retrieves a string from a store call following the "pass no buffer to get
/// the size, then pass a buffer to have the value written" convention.
///
/// `probe` is first called with `None` and must return the length of the value
/// in bytes, excluding the NUL terminator. It is then called with a buffer of
/// that length plus one, which it fills (terminator included). A negative
/// return from either call is a failure. The terminator is never part of the
/// returned string.
pub fn string_from_api<F>(mut probe: F) -> Result<String>
where
    F: FnMut(Option<&mut [u8]>) -> isize,
{
    let size = probe(None);
    let Ok(len) = usize::try_from(size) else {
        return Err(InvalidData::Retrieval(format!(
            "Failed to retrieve string size (status {size})"
        ))
        .into());
    };
    trace!(len, "probed string size");

    // Room for the terminator the store writes after the value
    let mut buf = vec![0u8; len + 1];

    let written = probe(Some(&mut buf));
    if written < 0 {
        return Err(InvalidData::Retrieval(format!(
            "Failed to write string to buffer (status {written})"
        ))
        .into());
    }

    buf.truncate(len);
    String::from_utf8(buf)
        .map_err(|e| InvalidData::Malformed(format!("String is not valid UTF-8: {e}")).into())
}

/// Writes `value` into `buf` the way a C-style store answers a size/fill probe.
///
/// Adapters use this to implement the probe side of [`string_from_api`].
pub fn fill_probe(value: &str, buf: Option<&mut [u8]>) -> isize {
    let bytes = value.as_bytes();
    if let Some(buf) = buf {
        if let Some(capacity) = buf.len().checked_sub(1) {
            let n = bytes.len().min(capacity);
            buf[..n].copy_from_slice(&bytes[..n]);
            buf[n] = 0;
        }
    }
    isize::try_from(bytes.len()).unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Failure, FailureKind};
    use proptest::prelude::*;

    #[test]
    fn test_empty_string() {
        let s = string_from_api(|buf| fill_probe("", buf)).unwrap();
        assert_eq!(s, "");
    }

    #[test]
    fn test_terminator_is_dropped() {
        let mut calls = Vec::new();
        let s = string_from_api(|buf| {
            calls.push(buf.as_ref().map(|b| b.len()));
            fill_probe("h1", buf)
        })
        .unwrap();
        assert_eq!(s, "h1");
        assert_eq!(calls, vec![None, Some(3)]);
    }

    #[test]
    fn test_negative_size_skips_fill() {
        let mut fill_calls = 0;
        let err = string_from_api(|buf| {
            if buf.is_some() {
                fill_calls += 1;
            }
            -1
        })
        .unwrap_err();
        assert_eq!(fill_calls, 0);
        assert!(matches!(
            err,
            Failure::InvalidData(InvalidData::Retrieval(ref m)) if m.contains("size")
        ));
    }

    #[test]
    fn test_negative_fill() {
        let err = string_from_api(|buf| if buf.is_none() { 4 } else { -3 }).unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidData);
        assert!(err.to_string().contains("write string"));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = string_from_api(|buf| {
            if let Some(buf) = buf {
                buf[0] = 0xFF;
                buf[1] = 0;
            }
            1
        })
        .unwrap_err();
        assert!(matches!(err, Failure::InvalidData(InvalidData::Malformed(_))));
    }

    #[test]
    fn test_fill_probe_truncates_to_capacity() {
        let mut buf = [0xAAu8; 3];
        assert_eq!(fill_probe("halo", Some(&mut buf)), 4);
        assert_eq!(&buf, b"ha\0");
    }

    proptest! {
        #[test]
        fn prop_round_trip(value in "[a-zA-Z0-9_ .-]{0,64}") {
            let s = string_from_api(|buf| fill_probe(&value, buf)).unwrap();
            prop_assert_eq!(s, value);
        }

        #[test]
        fn prop_negative_size_rejected(size in isize::MIN..0isize) {
            let mut filled = false;
            let result = string_from_api(|buf| {
                if buf.is_some() {
                    filled = true;
                }
                size
            });
            prop_assert!(result.is_err());
            prop_assert!(!filled);
        }
    }
}
