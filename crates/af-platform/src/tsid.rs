//! TSID Generation
//!
//! Time-sorted identifiers encoded as 13-character Crockford Base32 strings.
//! The top 42 bits carry milliseconds since a fixed epoch so IDs sort
//! lexicographically by creation time; the low 22 bits are random.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

/// Custom epoch: 2020-01-01T00:00:00Z in Unix milliseconds.
const TSID_EPOCH_MS: u64 = 1_577_836_800_000;

const CROCKFORD: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Last generated value, used to keep IDs strictly increasing within a process.
static LAST: AtomicU64 = AtomicU64::new(0);

pub struct TsidGenerator;

impl TsidGenerator {
    /// Generate a new TSID string.
    pub fn generate() -> String {
        let millis = Self::now_millis().saturating_sub(TSID_EPOCH_MS);
        let random: u64 = rand::thread_rng().gen_range(0..(1 << 22));
        let candidate = (millis << 22) | random;

        // Bump past the previous value if the clock has not advanced.
        let value = LAST
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(if candidate > last { candidate } else { last + 1 })
            })
            .map(|last| {
                if candidate > last {
                    candidate
                } else {
                    last + 1
                }
            })
            .unwrap_or(candidate);

        Self::encode(value)
    }

    fn now_millis() -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Encode a 64-bit value as 13 Crockford Base32 characters (65 bits,
    /// leading bit always zero).
    fn encode(value: u64) -> String {
        let mut out = [0u8; 13];
        for (i, slot) in out.iter_mut().enumerate() {
            let shift = 60usize.saturating_sub(i * 5);
            let index = if i == 0 {
                // Top character covers bits 63..60 only.
                ((value >> 60) & 0x0F) as usize
            } else {
                ((value >> shift) & 0x1F) as usize
            };
            *slot = CROCKFORD[index];
        }
        String::from_utf8_lossy(&out).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generates_13_crockford_chars() {
        let id = TsidGenerator::generate();
        assert_eq!(id.len(), 13);
        assert!(id.chars().all(|c| {
            matches!(c, '0'..='9' | 'A'..='H' | 'J'..='K' | 'M'..='N' | 'P'..='T' | 'V'..='Z')
        }));
    }

    #[test]
    fn generates_unique_ids() {
        let ids: HashSet<String> = (0..1000).map(|_| TsidGenerator::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn ids_sort_by_creation_time() {
        let id1 = TsidGenerator::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = TsidGenerator::generate();
        assert!(id2 > id1, "id2 ({}) should sort after id1 ({})", id2, id1);
    }

    #[test]
    fn ids_within_same_millisecond_still_increase() {
        let mut prev = TsidGenerator::generate();
        for _ in 0..100 {
            let next = TsidGenerator::generate();
            assert!(next > prev);
            prev = next;
        }
    }
}
