use crate::IDENTITY_POOL;
use chrono::{Datelike, Utc};

pub const IDENTITY_BLOCK_SIZE: usize = 128;

// Distance between the server and client blocks in the pool
const CLIENT_OFFSET: usize = IDENTITY_BLOCK_SIZE + 32;

/// Server and client identity blocks for one calendar day.
///
/// Both peers cut the same two blocks from [`IDENTITY_POOL`], so exchanging
/// them proves that each side runs this software on the same UTC date.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityBlocks {
    server: [u8; IDENTITY_BLOCK_SIZE],
    client: [u8; IDENTITY_BLOCK_SIZE],
}

impl IdentityBlocks {
    /// Blocks for the current UTC date
    pub fn today() -> Self {
        Self::for_date(Utc::now().date_naive())
    }

    pub fn for_date(date: impl Datelike) -> Self {
        let (server_at, client_at) = Self::offsets(date.month(), date.day());
        let mut blocks = Self {
            server: [0; IDENTITY_BLOCK_SIZE],
            client: [0; IDENTITY_BLOCK_SIZE],
        };
        blocks
            .server
            .copy_from_slice(&IDENTITY_POOL[server_at..server_at + IDENTITY_BLOCK_SIZE]);
        blocks
            .client
            .copy_from_slice(&IDENTITY_POOL[client_at..client_at + IDENTITY_BLOCK_SIZE]);
        blocks
    }

    fn offsets(month: u32, day: u32) -> (usize, usize) {
        // month + day >= 2 for any real date, so the largest start is 64
        let server_at = (64 % (month + day).max(1) as usize + 1) * 2;
        (server_at, server_at + CLIENT_OFFSET)
    }

    pub fn server_id(&self) -> &[u8] {
        &self.server
    }

    pub fn client_id(&self) -> &[u8] {
        &self.client
    }
}

impl std::fmt::Debug for IdentityBlocks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityBlocks")
            .field("server", &cm_crypto::to_hex(&self.server[..4]))
            .field("client", &cm_crypto::to_hex(&self.client[..4]))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }

    #[test]
    fn offsets_follow_the_date() {
        assert_eq!(IdentityBlocks::offsets(10, 18), (18, 178));
        assert_eq!(IdentityBlocks::offsets(12, 31), (44, 204));
        assert_eq!(IdentityBlocks::offsets(1, 1), (2, 162));
    }

    #[test]
    fn every_day_stays_inside_the_pool() {
        let mut day = date(1, 1);
        while day.year() == 2026 {
            let (server_at, client_at) = IdentityBlocks::offsets(day.month(), day.day());
            assert!(server_at + IDENTITY_BLOCK_SIZE <= IDENTITY_POOL.len());
            assert!(client_at + IDENTITY_BLOCK_SIZE <= IDENTITY_POOL.len());
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn blocks_are_cut_from_the_pool() {
        let blocks = IdentityBlocks::for_date(date(10, 18));
        assert_eq!(blocks.server_id()[..4], [0xd6u8, 0x05, 0xe6, 0x21]);
        assert_eq!(blocks.client_id()[..4], [0xc2u8, 0x35, 0xf5, 0x2e]);
        assert_eq!(blocks.server_id(), &IDENTITY_POOL[18..146]);
        assert_eq!(blocks.client_id(), &IDENTITY_POOL[178..306]);
    }

    #[test]
    fn blocks_depend_on_month_and_day_only() {
        let next_year = NaiveDate::from_ymd_opt(2027, 3, 4).unwrap();
        assert_eq!(IdentityBlocks::for_date(date(3, 4)), IdentityBlocks::for_date(next_year));
        assert_ne!(IdentityBlocks::for_date(date(1, 1)), IdentityBlocks::for_date(date(12, 31)));
    }
}
