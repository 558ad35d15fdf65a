//! Action nonces / 操作随机数
//!
//! A nonce is the first 10 hex chars of HMAC-SHA256 over
//! `"{tick}|{action}|{session}"`. The tick advances every half lifetime, so a
//! nonce stays valid for one to two half lifetimes.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Nonce length in hex chars (5 MAC bytes) / 随机数长度
const NONCE_LEN: usize = 10;

/// Nonce signer / 随机数签名器
#[derive(Clone)]
pub struct NonceSigner {
    secret: String,
    lifetime_secs: u64,
}

impl NonceSigner {
    pub fn new(secret: impl Into<String>, lifetime_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            lifetime_secs,
        }
    }

    /// Tick for a unix timestamp / 时间片编号
    pub fn tick_at(&self, now_secs: u64) -> u64 {
        let half = (self.lifetime_secs / 2).max(1);
        now_secs.div_ceil(half)
    }

    fn mac(&self, tick: u64, action: &str, session: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(format!("{}|{}|{}", tick, action, session).as_bytes());
        mac
    }

    fn sign(&self, tick: u64, action: &str, session: &str) -> String {
        let digest = self.mac(tick, action, session).finalize().into_bytes();
        hex::encode(&digest[..NONCE_LEN / 2])
    }

    /// Create a nonce at the given time / 在指定时间创建随机数
    pub fn create_at(&self, action: &str, session: &str, now_secs: u64) -> String {
        self.sign(self.tick_at(now_secs), action, session)
    }

    /// Create a nonce now / 创建随机数
    pub fn create(&self, action: &str, session: &str) -> String {
        self.create_at(action, session, now_secs())
    }

    /// Verify at the given time, accepting the current and previous tick / 校验随机数
    ///
    /// The MAC comparison is constant-time.
    pub fn verify_at(&self, nonce: &str, action: &str, session: &str, now_secs: u64) -> bool {
        if nonce.len() != NONCE_LEN {
            return false;
        }
        let Ok(tag) = hex::decode(nonce) else {
            return false;
        };
        let tick = self.tick_at(now_secs);
        [tick, tick.saturating_sub(1)]
            .iter()
            .any(|t| self.mac(*t, action, session).verify_truncated_left(&tag).is_ok())
    }

    pub fn verify(&self, nonce: &str, action: &str, session: &str) -> bool {
        self.verify_at(nonce, action, session, now_secs())
    }
}

fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
