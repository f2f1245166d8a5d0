use core::fmt;

/// Wire dumps are written when `IPMI_DEBUG` is set to a non-empty value.
pub(crate) fn enabled() -> bool {
    std::env::var_os("IPMI_DEBUG").is_some_and(|v| !v.is_empty())
}

/// Space-separated lowercase hex, the way packet captures print it.
pub(crate) struct Hex<'a>(pub(crate) &'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

pub(crate) fn dump_hex(label: &str, bytes: &[u8]) {
    if !enabled() {
        return;
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(len = bytes.len(), "{label}: {}", Hex(bytes));

    #[cfg(not(feature = "tracing"))]
    eprintln!("{label} ({}): {}", bytes.len(), Hex(bytes));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formats_like_a_capture() {
        assert_eq!(Hex(&[0x06, 0x00, 0xFF, 0x07]).to_string(), "06 00 ff 07");
        assert_eq!(Hex(&[]).to_string(), "");
    }
}
