use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{Session, SessionError, SessionStore};

type HmacSha256 = Hmac<Sha256>;

/// Sessions carried entirely in a signed cookie.
///
/// Cookie value layout: `base64url(json) "." base64url(hmac_sha256(json))`.
pub struct CookieStore {
    key: Vec<u8>,
}

impl CookieStore {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        CookieStore {
            key: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self) -> Result<HmacSha256, SessionError> {
        HmacSha256::new_from_slice(&self.key).map_err(|e| SessionError::Key(e.to_string()))
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, SessionError> {
        let mut mac = self.mac()?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<bool, SessionError> {
        let mut mac = self.mac()?;
        mac.update(payload);
        Ok(mac.verify_slice(signature).is_ok())
    }
}

#[async_trait]
impl SessionStore for CookieStore {
    async fn load(&self, cookie_value: &str) -> Result<Option<Session>, SessionError> {
        let Some((payload, signature)) = cookie_value.split_once('.') else {
            return Ok(None);
        };
        let (Ok(payload), Ok(signature)) =
            (URL_SAFE_NO_PAD.decode(payload), URL_SAFE_NO_PAD.decode(signature))
        else {
            return Ok(None);
        };

        if !self.verify(&payload, &signature)? {
            return Ok(None);
        }

        Ok(serde_json::from_slice(&payload).ok())
    }

    async fn save(&self, session: &Session) -> Result<String, SessionError> {
        let payload = serde_json::to_vec(session)?;
        let signature = self.sign(&payload)?;
        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }
}
