use crate::errors::Error;
use crate::types::{AuctionState, MintPhase};

pub const DAY_IN_SECONDS: u64 = 86_400;

pub fn phase(state: &AuctionState, cooldown: u64, now: u64) -> MintPhase {
    if state.mint_count >= state.mint_limit {
        MintPhase::Exhausted
    } else if now >= next_mint_at(state, cooldown) {
        MintPhase::Eligible
    } else {
        MintPhase::Open
    }
}

pub fn next_mint_at(state: &AuctionState, cooldown: u64) -> u64 {
    state.last_mint_at.saturating_add(cooldown)
}

pub fn ensure_mintable(state: &AuctionState, cooldown: u64, now: u64) -> Result<(), Error> {
    match phase(state, cooldown, now) {
        MintPhase::Eligible => Ok(()),
        MintPhase::Open => Err(Error::NotYetCallable),
        MintPhase::Exhausted => Err(Error::LimitExceeded),
    }
}

pub fn record_mint(state: &mut AuctionState, now: u64) {
    state.mint_count += 1;
    state.last_mint_at = now;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(last_mint_at: u64, mint_count: u32, mint_limit: u32) -> AuctionState {
        AuctionState {
            last_mint_at,
            mint_count,
            mint_limit,
        }
    }

    #[test]
    fn test_cooldown_boundary() {
        let s = state(1_000, 0, 3);
        assert_eq!(phase(&s, DAY_IN_SECONDS, 1_000 + DAY_IN_SECONDS - 1), MintPhase::Open);
        assert_eq!(phase(&s, DAY_IN_SECONDS, 1_000 + DAY_IN_SECONDS), MintPhase::Eligible);
        assert_eq!(
            ensure_mintable(&s, DAY_IN_SECONDS, 1_000),
            Err(Error::NotYetCallable)
        );
    }

    #[test]
    fn test_exhausted_wins_over_cooldown() {
        let s = state(0, 2, 2);
        assert_eq!(phase(&s, DAY_IN_SECONDS, u64::MAX), MintPhase::Exhausted);
        assert_eq!(
            ensure_mintable(&s, DAY_IN_SECONDS, u64::MAX),
            Err(Error::LimitExceeded)
        );
    }

    #[test]
    fn test_record_mint_resets_cooldown() {
        let mut s = state(0, 0, 2);
        record_mint(&mut s, 5 * DAY_IN_SECONDS);
        assert_eq!(s.mint_count, 1);
        assert_eq!(next_mint_at(&s, DAY_IN_SECONDS), 6 * DAY_IN_SECONDS);
        assert_eq!(phase(&s, DAY_IN_SECONDS, 5 * DAY_IN_SECONDS), MintPhase::Open);

        record_mint(&mut s, 6 * DAY_IN_SECONDS);
        assert_eq!(phase(&s, DAY_IN_SECONDS, 9 * DAY_IN_SECONDS), MintPhase::Exhausted);
    }

    #[test]
    fn test_next_mint_saturates() {
        let s = state(u64::MAX - 10, 0, 1);
        assert_eq!(next_mint_at(&s, DAY_IN_SECONDS), u64::MAX);
    }
}
