//! Pair registry
//!
//! Lists trading pairs and assigns pair ids (starting at 1). At most one
//! pair may exist per unordered asset combination: BTC/USDT and USDT/BTC
//! are the same listing.

use std::collections::HashMap;
use types::ids::{AssetId, PairId};
use types::numeric::{Amount, Price};
use types::pair::Pair;

use crate::error::ExchangeError;

#[derive(Debug)]
pub struct PairRegistry {
    pairs: HashMap<PairId, Pair>,
    /// Canonical (sorted) asset combination -> pair id
    by_assets: HashMap<(AssetId, AssetId), PairId>,
    next_pair_id: u64,
}

/// Sort the two assets so lookup ignores base/quote orientation
fn canonical_key(a: &AssetId, b: &AssetId) -> (AssetId, AssetId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

impl PairRegistry {
    pub fn new() -> Self {
        Self {
            pairs: HashMap::new(),
            by_assets: HashMap::new(),
            next_pair_id: 1,
        }
    }

    /// List a new pair with its tick size and minimum order size.
    pub fn create(
        &mut self,
        base: AssetId,
        quote: AssetId,
        tick_size: Price,
        min_order_size: Amount,
    ) -> Result<PairId, ExchangeError> {
        if base == quote {
            return Err(ExchangeError::IdenticalAssets);
        }
        if !tick_size.is_positive() {
            return Err(ExchangeError::InvalidTick);
        }
        if !min_order_size.is_positive() {
            return Err(ExchangeError::InvalidMinSize);
        }
        let key = canonical_key(&base, &quote);
        if self.by_assets.contains_key(&key) {
            return Err(ExchangeError::PairExists {
                base: base.to_string(),
                quote: quote.to_string(),
            });
        }

        let pair_id = PairId::from_u64(self.next_pair_id);
        self.next_pair_id += 1;
        self.by_assets.insert(key, pair_id);
        self.pairs
            .insert(pair_id, Pair::new(pair_id, base, quote, tick_size, min_order_size));
        Ok(pair_id)
    }

    pub fn get(&self, pair_id: PairId) -> Result<&Pair, ExchangeError> {
        self.pairs
            .get(&pair_id)
            .ok_or(ExchangeError::PairNotFound { pair_id })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl Default for PairRegistry {
    fn default() -> Self {
        Self::new()
    }
}
