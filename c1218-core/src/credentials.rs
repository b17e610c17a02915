//! Fixed-width credential fields
//!
//! C12.18 carries the security code and the user name as fixed-length
//! fields padded on the right with ASCII spaces. Longer input is
//! truncated, shorter input is padded.

use std::fmt;

/// Padding byte for fixed-width fields
pub const PAD_BYTE: u8 = 0x20;

/// Length of the security code field (Security service)
pub const SECURITY_CODE_LENGTH: usize = 20;

/// Length of the user name field (Logon service)
pub const USER_NAME_LENGTH: usize = 10;

fn pad<const N: usize>(input: &[u8]) -> [u8; N] {
    let mut field = [PAD_BYTE; N];
    let len = input.len().min(N);
    field[..len].copy_from_slice(&input[..len]);
    field
}

/// 20-byte security code (shared secret sent in cleartext)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SecurityCode([u8; SECURITY_CODE_LENGTH]);

impl SecurityCode {
    /// Build a security code from raw bytes, padding or truncating to 20 bytes
    pub fn new(code: &[u8]) -> Self {
        Self(pad(code))
    }

    pub fn as_bytes(&self) -> &[u8; SECURITY_CODE_LENGTH] {
        &self.0
    }
}

impl Default for SecurityCode {
    fn default() -> Self {
        Self([PAD_BYTE; SECURITY_CODE_LENGTH])
    }
}

impl From<&str> for SecurityCode {
    fn from(code: &str) -> Self {
        Self::new(code.as_bytes())
    }
}

impl From<&[u8]> for SecurityCode {
    fn from(code: &[u8]) -> Self {
        Self::new(code)
    }
}

// Never print the secret itself
impl fmt::Debug for SecurityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecurityCode(****)")
    }
}

/// 10-byte user name sent with the Logon service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserName([u8; USER_NAME_LENGTH]);

impl UserName {
    /// Build a user name from raw bytes, padding or truncating to 10 bytes
    pub fn new(name: &[u8]) -> Self {
        Self(pad(name))
    }

    pub fn as_bytes(&self) -> &[u8; USER_NAME_LENGTH] {
        &self.0
    }
}

impl Default for UserName {
    fn default() -> Self {
        Self(*b"0123456789")
    }
}

impl From<&str> for UserName {
    fn from(name: &str) -> Self {
        Self::new(name.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_code_padding() {
        let code = SecurityCode::from("secret");
        assert_eq!(&code.as_bytes()[..6], b"secret");
        assert!(code.as_bytes()[6..].iter().all(|&b| b == PAD_BYTE));
    }

    #[test]
    fn test_security_code_truncation() {
        let code = SecurityCode::new(&[0xAB; 25]);
        assert_eq!(code.as_bytes(), &[0xAB; 20]);
    }

    #[test]
    fn test_security_code_debug_hides_secret() {
        let code = SecurityCode::from("hunter2");
        assert!(!format!("{:?}", code).contains("hunter2"));
    }

    #[test]
    fn test_user_name() {
        assert_eq!(UserName::from("ops").as_bytes(), b"ops       ");
        assert_eq!(UserName::from("administrator").as_bytes(), b"administra");
        assert_eq!(UserName::default().as_bytes(), b"0123456789");
    }
}
