use secrecy::{ExposeSecret, SecretBox};

/// Passphrase material of a single group, zeroized on drop.
pub struct Passphrase {
    inner: SecretBox<Vec<u8>>,
}

impl Passphrase {
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self { inner: SecretBox::new(Box::new(data)) }
    }

    /// Reassembles a passphrase from its fragments, in the order given.
    pub fn from_fragments<'a>(fragments: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut data = Vec::new();
        for fragment in fragments {
            data.extend_from_slice(fragment);
        }
        Self::from_vec(data)
    }

    pub fn expose_secret(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<SecretBox<Vec<u8>>> for Passphrase {
    fn from(secret: SecretBox<Vec<u8>>) -> Self {
        Self { inner: secret }
    }
}

impl std::fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Passphrase([... {} bytes ...])", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fragments_concatenates_in_order() {
        let passphrase = Passphrase::from_fragments([&b"ab"[..], &b"cd"[..], &b"e"[..]]);
        assert_eq!(passphrase.expose_secret(), b"abcde");
        assert_eq!(passphrase.len(), 5);
    }

    #[test]
    fn test_debug_is_redacted() {
        let passphrase = Passphrase::from_vec(b"hunter2".to_vec());
        assert_eq!(format!("{passphrase:?}"), "Passphrase([... 7 bytes ...])");
    }
}
