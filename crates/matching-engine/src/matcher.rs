//! Price-time priority matching
//!
//! One call matches one incoming order against one book. The caller holds
//! the book's exclusive lock for the whole call, so the loop including any
//! remainder insertion is atomic to outside observers.

use tracing::debug;

use crate::book::OrderBook;
use crate::domain::{Order, OrderKind, OrderStatus, Side, Trade};
use crate::error::EngineError;

/// Match an incoming order against the opposing ladder
///
/// Walks best price first, FIFO within a level. Trades always execute at
/// the resting order's price, so an aggressive limit gets price
/// improvement. Market orders are checked against the full opposing-side
/// liquidity before the first mutation; on `InsufficientLiquidity` the book
/// is untouched.
pub(crate) fn execute(book: &mut OrderBook, taker: &mut Order) -> Result<Vec<Trade>, EngineError> {
    if taker.kind == OrderKind::Market {
        let available = book.side_liquidity(taker.side.opposite());
        if available < taker.quantity {
            return Err(EngineError::InsufficientLiquidity {
                available,
                requested: taker.quantity,
            });
        }
    }

    let trades = match taker.side {
        Side::Buy => match_against_asks(book, taker),
        Side::Sell => match_against_bids(book, taker),
    };
    Ok(trades)
}

/// Consume asks from the lowest price upward
fn match_against_asks(book: &mut OrderBook, taker: &mut Order) -> Vec<Trade> {
    let mut trades = Vec::new();

    while taker.remaining() > 0 {
        let Some(best) = book.best_ask() else { break };
        // Market orders never stop for price reasons
        if taker.kind == OrderKind::Limit && taker.price < best {
            break;
        }

        let queue = book.asks.get_mut(&best).expect("best ask level must exist");
        let maker_id = *queue.front().expect("price level is never empty");
        let maker = book
            .orders
            .get_mut(&maker_id)
            .expect("ladder entry missing from order index");

        let quantity = taker.remaining().min(maker.remaining());
        taker.fill(quantity);
        maker.fill(quantity);

        // Incoming side is BUY, so the maker is the seller
        let trade = Trade::new(&book.symbol, best, quantity, taker.id, maker_id);
        debug!(
            trade_id = %trade.id,
            symbol = %book.symbol,
            price = best,
            quantity,
            "trade executed"
        );

        if maker.is_filled() {
            maker.status = OrderStatus::Filled;
            queue.pop_front();
        } else {
            maker.status = OrderStatus::PartialFill;
        }
        if queue.is_empty() {
            book.asks.remove(&best);
        }

        trades.push(trade);
    }

    trades
}

/// Consume bids from the highest price downward
fn match_against_bids(book: &mut OrderBook, taker: &mut Order) -> Vec<Trade> {
    let mut trades = Vec::new();

    while taker.remaining() > 0 {
        let Some(best) = book.best_bid() else { break };
        if taker.kind == OrderKind::Limit && taker.price > best {
            break;
        }

        let queue = book
            .bids
            .get_mut(&std::cmp::Reverse(best))
            .expect("best bid level must exist");
        let maker_id = *queue.front().expect("price level is never empty");
        let maker = book
            .orders
            .get_mut(&maker_id)
            .expect("ladder entry missing from order index");

        let quantity = taker.remaining().min(maker.remaining());
        taker.fill(quantity);
        maker.fill(quantity);

        // Incoming side is SELL, so the maker is the buyer
        let trade = Trade::new(&book.symbol, best, quantity, maker_id, taker.id);
        debug!(
            trade_id = %trade.id,
            symbol = %book.symbol,
            price = best,
            quantity,
            "trade executed"
        );

        if maker.is_filled() {
            maker.status = OrderStatus::Filled;
            queue.pop_front();
        } else {
            maker.status = OrderStatus::PartialFill;
        }
        if queue.is_empty() {
            book.bids.remove(&std::cmp::Reverse(best));
        }

        trades.push(trade);
    }

    trades
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rest(book: &mut OrderBook, side: Side, price: i64, quantity: i64) -> Order {
        let symbol = book.symbol().to_string();
        let mut order = Order::new(symbol, side, OrderKind::Limit, price, quantity);
        order.sequence = book.next_sequence();
        book.insert(&order);
        book.register(order.clone());
        order
    }

    #[test]
    fn test_trade_price_is_maker_price() {
        let mut book = OrderBook::new("AAPL");
        rest(&mut book, Side::Sell, 15000, 100);

        let mut taker = Order::new("AAPL", Side::Buy, OrderKind::Limit, 15100, 100);
        let trades = execute(&mut book, &mut taker).unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, 15000);
        assert!(taker.is_filled());
    }

    #[test]
    fn test_buyer_seller_assignment() {
        let mut book = OrderBook::new("AAPL");
        let resting_buy = rest(&mut book, Side::Buy, 15000, 50);

        let mut taker = Order::new("AAPL", Side::Sell, OrderKind::Limit, 15000, 50);
        let trades = execute(&mut book, &mut taker).unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].buyer_order_id, resting_buy.id);
        assert_eq!(trades[0].seller_order_id, taker.id);
    }

    #[test]
    fn test_no_cross_leaves_book_untouched() {
        let mut book = OrderBook::new("AAPL");
        rest(&mut book, Side::Sell, 15100, 100);

        let mut taker = Order::new("AAPL", Side::Buy, OrderKind::Limit, 15000, 100);
        let trades = execute(&mut book, &mut taker).unwrap();

        assert!(trades.is_empty());
        assert_eq!(taker.filled, 0);
        assert_eq!(book.side_liquidity(Side::Sell), 100);
    }

    #[test]
    fn test_market_precheck_rejects_without_mutation() {
        let mut book = OrderBook::new("AAPL");
        let resting = rest(&mut book, Side::Sell, 14000, 50);

        let mut taker = Order::new("AAPL", Side::Buy, OrderKind::Market, 0, 100);
        let err = execute(&mut book, &mut taker).unwrap_err();

        assert!(matches!(
            err,
            EngineError::InsufficientLiquidity {
                available: 50,
                requested: 100
            }
        ));
        assert_eq!(taker.filled, 0);
        let untouched = book.order(resting.id).unwrap();
        assert_eq!(untouched.filled, 0);
        assert_eq!(untouched.status, OrderStatus::Accepted);
    }

    #[test]
    fn test_market_consumes_across_levels() {
        let mut book = OrderBook::new("AAPL");
        rest(&mut book, Side::Sell, 20000, 100);
        rest(&mut book, Side::Sell, 20050, 200);

        let mut taker = Order::new("AAPL", Side::Buy, OrderKind::Market, 0, 150);
        let trades = execute(&mut book, &mut taker).unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!((trades[0].price, trades[0].quantity), (20000, 100));
        assert_eq!((trades[1].price, trades[1].quantity), (20050, 50));
        assert!(taker.is_filled());
        assert_eq!(book.side_liquidity(Side::Sell), 150);
    }

    #[test]
    fn test_filled_maker_is_popped_partial_stays() {
        let mut book = OrderBook::new("AAPL");
        let first = rest(&mut book, Side::Sell, 15050, 100);
        let second = rest(&mut book, Side::Sell, 15050, 100);

        let mut taker = Order::new("AAPL", Side::Buy, OrderKind::Limit, 15050, 150);
        let trades = execute(&mut book, &mut taker).unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(book.order(first.id).unwrap().status, OrderStatus::Filled);

        let partial = book.order(second.id).unwrap();
        assert_eq!(partial.status, OrderStatus::PartialFill);
        assert_eq!(partial.filled, 50);

        // The partially filled maker keeps its place at the head of the level
        let queue = book.asks.get(&15050).unwrap();
        assert_eq!(queue.front(), Some(&second.id));
    }

    #[test]
    fn test_empty_level_is_removed() {
        let mut book = OrderBook::new("AAPL");
        rest(&mut book, Side::Buy, 15000, 10);

        let mut taker = Order::new("AAPL", Side::Sell, OrderKind::Limit, 15000, 10);
        execute(&mut book, &mut taker).unwrap();

        assert!(book.bids.is_empty());
        assert_eq!(book.best_bid(), None);
    }
}
