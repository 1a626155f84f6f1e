//! Crossing test

use types::numeric::Price;

/// A bid and an ask cross when the bid is willing to pay at least the ask.
/// Equality crosses: the fill executes at the maker's price.
pub fn crosses(bid: Price, ask: Price) -> bool {
    bid >= ask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        Price::from_str(s).unwrap()
    }

    #[test]
    fn test_bid_above_ask_crosses() {
        assert!(crosses(price("1.02"), price("1.01")));
    }

    #[test]
    fn test_equal_prices_cross() {
        assert!(crosses(price("1.01"), price("1.01")));
    }

    #[test]
    fn test_bid_below_ask_does_not_cross() {
        assert!(!crosses(price("1.00"), price("1.01")));
    }
}
