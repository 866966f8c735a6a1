use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

const NONCE_SIZE: usize = 12; // AES-GCM standard nonce size

/// Seals secret settings (bot token, shared secret) before they are written to
/// the settings table, and opens them on the way back out. The key is fixed at
/// startup; a value sealed under a different key fails to open.
pub struct SettingSealer {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for SettingSealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingSealer").finish_non_exhaustive()
    }
}

impl SettingSealer {
    pub fn from_hex_key(key_hex: &str) -> Result<Self, String> {
        let key_bytes = hex::decode(key_hex).map_err(|e| format!("Invalid hex key: {e}"))?;
        if key_bytes.len() != 32 {
            return Err("Sealing key must be 32 bytes (256 bits) long".to_string());
        }
        Ok(Self {
            cipher: Aes256Gcm::new(key_bytes.as_slice().into()),
        })
    }

    pub fn seal(&self, plain_text: &str) -> Result<String, String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plain_text.as_bytes())
            .map_err(|e| format!("Sealing failed: {e}"))?;

        let mut result = nonce.to_vec();
        result.extend_from_slice(&ciphertext);

        Ok(hex::encode(result))
    }

    pub fn open(&self, sealed_hex: &str) -> Result<String, String> {
        let sealed_data =
            hex::decode(sealed_hex).map_err(|e| format!("Invalid hex ciphertext: {e}"))?;
        if sealed_data.len() < NONCE_SIZE {
            return Err("Ciphertext is too short to contain a nonce".to_string());
        }

        let (nonce_bytes, ciphertext) = sealed_data.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plain_bytes = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| format!("Opening failed: {e}"))?;

        String::from_utf8(plain_bytes).map_err(|e| format!("Invalid UTF-8 sequence: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn test_seal_open_roundtrip() {
        let sealer = SettingSealer::from_hex_key(KEY_HEX).unwrap();
        let token = "7012345678:AAFakeBotTokenValue";

        let sealed = sealer.seal(token).unwrap();
        let opened = sealer.open(&sealed).unwrap();

        assert_ne!(token, sealed);
        assert_eq!(token, opened);
    }

    #[test]
    fn test_open_with_wrong_key() {
        let other_key = "f1e1d1c1b1a191817161514131211101f0e0d0c0b0a090807060504030201000";
        let sealer = SettingSealer::from_hex_key(KEY_HEX).unwrap();
        let other = SettingSealer::from_hex_key(other_key).unwrap();

        let sealed = sealer.seal("shared-secret").unwrap();
        let result = other.open(&sealed);

        assert!(result.is_err());
        assert_eq!(result.unwrap_err(), "Opening failed: aead::Error");
    }

    #[test]
    fn test_invalid_key_length() {
        let short_key = "1234";
        let result = SettingSealer::from_hex_key(short_key);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err(),
            "Sealing key must be 32 bytes (256 bits) long"
        );
    }

    #[test]
    fn test_invalid_hex_inputs() {
        assert!(SettingSealer::from_hex_key("not-a-hex-string")
            .unwrap_err()
            .contains("Invalid hex key"));

        let sealer = SettingSealer::from_hex_key(KEY_HEX).unwrap();
        assert!(sealer
            .open("not-a-hex-cipher")
            .unwrap_err()
            .contains("Invalid hex ciphertext"));
        assert!(sealer
            .open("0011")
            .unwrap_err()
            .contains("too short to contain a nonce"));
    }
}
