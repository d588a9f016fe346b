use anyhow::{bail, Result};
use sha2::{Digest, Sha256};
use std::fmt::Display;

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Checksum {
    Sha256(Vec<u8>),
}

pub enum ChecksumValidator {
    Sha256((Vec<u8>, Sha256)),
}

impl ChecksumValidator {
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        match self {
            ChecksumValidator::Sha256((_, v)) => v.update(data),
        }
    }

    pub fn finish(self) -> bool {
        match self {
            ChecksumValidator::Sha256((c, v)) => c == v.finalize().to_vec(),
        }
    }
}

impl Checksum {
    pub fn from_sha256_str(s: &str) -> Result<Self> {
        if s.len() != 64 {
            bail!("Malformed Sha256 string: bad length")
        }
        Ok(Checksum::Sha256(hex::decode(s)?))
    }

    pub fn get_validator(&self) -> ChecksumValidator {
        match self {
            Checksum::Sha256(c) => ChecksumValidator::Sha256((c.clone(), Sha256::new())),
        }
    }

    pub fn cmp_bytes(&self, data: &[u8]) -> bool {
        let mut validator = self.get_validator();
        validator.update(data);
        validator.finish()
    }
}

impl Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Checksum::Sha256(hex) => {
                f.write_str("sha256::")?;
                f.write_str(&hex::encode(hex))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // sha256("hello\n")
    const HELLO_SHA256: &str = "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03";

    #[test]
    fn test_cmp_bytes() {
        let c = Checksum::from_sha256_str(HELLO_SHA256).unwrap();
        assert!(c.cmp_bytes(b"hello\n"));
        assert!(!c.cmp_bytes(b"hello"));
        assert_eq!(c.to_string(), format!("sha256::{}", HELLO_SHA256));
    }

    #[test]
    fn test_bad_length() {
        assert!(Checksum::from_sha256_str("abcd").is_err());
        assert!(Checksum::from_sha256_str(&"zz".repeat(32)).is_err());
    }
}
