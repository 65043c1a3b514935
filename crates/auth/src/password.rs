//! PIN-Hashing mit PBKDF2-HMAC-SHA256
//!
//! Neues Format (Django-kompatibel):
//! `pbkdf2_sha256$<iterationen>$<salt>$<base64(digest)>`
//!
//! Altbestand: 64 Hex-Zeichen, ungesalzener SHA-256 der PIN. Solche Hashes
//! werden weiterhin verifiziert und beim naechsten bekannten Klartext
//! (Login, Admin-Reset) durch das neue Format ersetzt.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

/// Algorithmus-Kennung im gespeicherten Hash
const ALGORITHMUS: &str = "pbkdf2_sha256";

/// Standard-Iterationszahl (Django 4.2)
pub const STANDARD_ITERATIONEN: u32 = 600_000;

const SALT_LAENGE: usize = 22;
const DIGEST_LAENGE: usize = 32;

/// Erkanntes Format eines gespeicherten PIN-Hashes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashFormat<'a> {
    Pbkdf2 {
        iterationen: u32,
        salt: &'a str,
        digest: &'a str,
    },
    /// Ungesalzener SHA-256 als Hex
    LegacySha256,
    Unbekannt,
}

impl<'a> HashFormat<'a> {
    pub fn erkennen(blob: &'a str) -> Self {
        let mut teile = blob.split('$');
        if let (Some(ALGORITHMUS), Some(iter), Some(salt), Some(digest), None) = (
            teile.next(),
            teile.next(),
            teile.next(),
            teile.next(),
            teile.next(),
        ) {
            return match iter.parse::<u32>() {
                Ok(iterationen) if iterationen > 0 && !salt.is_empty() => Self::Pbkdf2 {
                    iterationen,
                    salt,
                    digest,
                },
                _ => Self::Unbekannt,
            };
        }

        if blob.len() == 64 && blob.bytes().all(|b| b.is_ascii_hexdigit()) {
            Self::LegacySha256
        } else {
            Self::Unbekannt
        }
    }
}

/// Hasht und verifiziert PINs
#[derive(Debug, Clone, Copy)]
pub struct PinHasher {
    iterationen: u32,
}

impl Default for PinHasher {
    fn default() -> Self {
        Self::neu(STANDARD_ITERATIONEN)
    }
}

impl PinHasher {
    pub fn neu(iterationen: u32) -> Self {
        Self {
            iterationen: iterationen.max(1),
        }
    }

    pub fn iterationen(&self) -> u32 {
        self.iterationen
    }

    /// Erzeugt immer das neue PBKDF2-Format mit frischem Salt
    pub fn hashen(&self, pin: &str) -> String {
        let salt: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SALT_LAENGE)
            .map(char::from)
            .collect();
        let digest = pbkdf2_digest(pin, &salt, self.iterationen);
        format!(
            "{ALGORITHMUS}${}${salt}${}",
            self.iterationen,
            STANDARD.encode(digest)
        )
    }

    /// Prueft eine PIN gegen einen gespeicherten Hash beliebigen Formats
    pub fn verifizieren(&self, pin: &str, blob: &str) -> bool {
        match HashFormat::erkennen(blob) {
            HashFormat::Pbkdf2 {
                iterationen,
                salt,
                digest,
            } => {
                let Ok(erwartet) = STANDARD.decode(digest) else {
                    tracing::warn!("PIN-Hash mit ungueltigem Base64-Digest");
                    return false;
                };
                let berechnet = pbkdf2_digest(pin, salt, iterationen);
                konstante_zeit_gleich(&berechnet, &erwartet)
            }
            HashFormat::LegacySha256 => {
                let Ok(erwartet) = hex::decode(blob) else {
                    return false;
                };
                let berechnet = Sha256::digest(pin.as_bytes());
                konstante_zeit_gleich(berechnet.as_slice(), &erwartet)
            }
            HashFormat::Unbekannt => {
                tracing::warn!("PIN-Hash in unbekanntem Format");
                false
            }
        }
    }

    /// `true` fuer Legacy-Hashes und fuer PBKDF2-Hashes mit zu wenigen
    /// Iterationen. Ein aktueller Hash wird nie erneut kodiert.
    pub fn braucht_upgrade(&self, blob: &str) -> bool {
        match HashFormat::erkennen(blob) {
            HashFormat::Pbkdf2 { iterationen, .. } => iterationen < self.iterationen,
            HashFormat::LegacySha256 => true,
            HashFormat::Unbekannt => false,
        }
    }
}

fn pbkdf2_digest(pin: &str, salt: &str, iterationen: u32) -> [u8; DIGEST_LAENGE] {
    let mut ausgabe = [0u8; DIGEST_LAENGE];
    pbkdf2::pbkdf2_hmac::<Sha256>(pin.as_bytes(), salt.as_bytes(), iterationen, &mut ausgabe);
    ausgabe
}

/// Vergleich ohne fruehen Abbruch
pub(crate) fn konstante_zeit_gleich(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
