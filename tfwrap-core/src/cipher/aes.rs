use base64::{engine::general_purpose::STANDARD, Engine as _};
use ring::aead;
use ring::rand::{SecureRandom, SystemRandom};
use tfwrap_schemas::{Error, Result};

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Symmetric AES-GCM engine keyed by locally supplied material.
///
/// Ciphertexts are base64 over `nonce || ciphertext || tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AesEngine {
    key: Vec<u8>,
}

impl AesEngine {
    /// Build an engine from a hex-encoded 128- or 256-bit key.
    pub fn new(key: &str) -> Result<Self> {
        let key = hex::decode(key).map_err(|err| Error::EngineConstruction {
            engine: "aes",
            message: format!("key is not valid hex: {err}"),
        })?;
        if key.len() != 16 && key.len() != 32 {
            return Err(Error::EngineConstruction {
                engine: "aes",
                message: format!("key must be 16 or 32 bytes, got {}", key.len()),
            });
        }
        Ok(Self { key })
    }

    fn sealing_key(&self) -> Result<aead::LessSafeKey> {
        let algorithm = if self.key.len() == 16 {
            &aead::AES_128_GCM
        } else {
            &aead::AES_256_GCM
        };
        let key = aead::UnboundKey::new(algorithm, &self.key).map_err(|_| Error::Decryption {
            engine: "aes",
            message: "invalid key material".into(),
        })?;
        Ok(aead::LessSafeKey::new(key))
    }

    /// Encrypt a plaintext into the framed base64 form.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let rng = SystemRandom::new();
        let mut nonce = [0u8; NONCE_LEN];
        rng.fill(&mut nonce).map_err(|err| Error::Decryption {
            engine: "aes",
            message: format!("rng: {err:?}"),
        })?;

        let key = self.sealing_key()?;
        let mut in_out = plaintext.as_bytes().to_vec();
        in_out.reserve(TAG_LEN);
        key.seal_in_place_append_tag(
            aead::Nonce::assume_unique_for_key(nonce),
            aead::Aad::empty(),
            &mut in_out,
        )
        .map_err(|_| Error::Decryption {
            engine: "aes",
            message: "seal failed".into(),
        })?;

        let mut framed = Vec::with_capacity(NONCE_LEN + in_out.len());
        framed.extend_from_slice(&nonce);
        framed.extend_from_slice(&in_out);
        Ok(STANDARD.encode(framed))
    }

    /// Decrypt a framed base64 ciphertext.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let data = STANDARD.decode(ciphertext).map_err(|_| Error::Decryption {
            engine: "aes",
            message: "ciphertext is not valid base64".into(),
        })?;
        if data.len() < NONCE_LEN + TAG_LEN {
            return Err(Error::Decryption {
                engine: "aes",
                message: "ciphertext too short".into(),
            });
        }
        let (nonce, sealed) = data.split_at(NONCE_LEN);

        let key = self.sealing_key()?;
        let mut buffer = sealed.to_vec();
        let nonce = aead::Nonce::try_assume_unique_for_key(nonce).map_err(|_| Error::Decryption {
            engine: "aes",
            message: "invalid nonce length".into(),
        })?;
        let plaintext = key
            .open_in_place(nonce, aead::Aad::empty(), &mut buffer)
            .map_err(|_| Error::Decryption {
                engine: "aes",
                message: "authentication failed".into(),
            })?;

        String::from_utf8(plaintext.to_vec()).map_err(|err| Error::Decryption {
            engine: "aes",
            message: format!("plaintext is not valid utf-8: {err}"),
        })
    }
}
