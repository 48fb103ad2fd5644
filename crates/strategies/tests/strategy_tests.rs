use bar_store::{BarSeries, Universe};
use chrono::{Days, NaiveDate};
use configuration::SmaCrossoverParams;
use core_types::{Bar, Fill, LotSize, OrderIntent, OrderPrice};
use events::{Event, EventQueue};
use executor::Portfolio;
use market_data::Replayer;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use strategies::{SmaCrossover, Strategy, StrategyContext};

fn day(i: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 6, 3)
        .unwrap()
        .checked_add_days(Days::new(i))
        .unwrap()
}

fn series(symbol: &str, first_day: u64, closes: &[Decimal]) -> BarSeries {
    BarSeries {
        symbol: symbol.to_string(),
        bars: closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                close,
                suspended: false,
                ..Bar::placeholder(symbol, day(first_day + i as u64))
            })
            .collect(),
        warmup: Vec::new(),
    }
}

fn replayer(len: usize, instruments: Vec<BarSeries>) -> Replayer {
    let symbols = instruments.iter().map(|s| s.symbol.clone()).collect();
    Replayer::new(Universe {
        benchmark: series("IDX", 0, &vec![dec!(3000); len]),
        instruments,
        symbols,
        pruned: Vec::new(),
    })
}

fn orders(queue: &mut EventQueue) -> Vec<OrderIntent> {
    std::iter::from_fn(|| queue.pop())
        .filter_map(|event| match event {
            Event::Order(intent) => Some(intent),
            _ => None,
        })
        .collect()
}

#[test]
fn order_helpers_floor_to_lots_and_skip_small_orders() {
    let mut market = replayer(1, vec![series("A", 0, &[dec!(10)])]);
    market.advance().unwrap();
    let portfolio = Portfolio::new(dec!(100000), market.symbols());
    let mut queue = EventQueue::new();
    let mut ctx = StrategyContext::new(&market, &portfolio, &mut queue, LotSize::STANDARD);

    let intent = ctx.order_shares("A", 250, OrderPrice::Market).unwrap().unwrap();
    assert_eq!(intent.quantity, dec!(200));
    assert!(ctx.order_shares("A", 99, OrderPrice::Market).unwrap().is_none());

    // 5,555 / 10 = 555.5 shares -> 500
    let intent = ctx.order_value("A", dec!(5555), OrderPrice::Market).unwrap().unwrap();
    assert_eq!(intent.quantity, dec!(500));

    // Sized at the limit price, not the close.
    let limit = OrderPrice::Limit(dec!(5));
    let intent = ctx.order_value("A", dec!(5555), limit).unwrap().unwrap();
    assert_eq!(intent.quantity, dec!(1100));
    assert_eq!(intent.price, limit);

    assert!(ctx.order_shares("ZZZ", 100, OrderPrice::Market).is_err());

    let queued = orders(&mut queue);
    assert_eq!(queued.len(), 3);
    assert_eq!(queued[0].quantity, dec!(200));
}

#[test]
fn target_helpers_trade_the_difference() {
    let mut market = replayer(1, vec![series("A", 0, &[dec!(20)])]);
    market.advance().unwrap();
    let mut portfolio = Portfolio::new(dec!(100000), market.symbols());
    portfolio.apply_fill(&Fill {
        symbol: "A".to_string(),
        quantity: 300,
        price: dec!(20),
        commission: dec!(5),
    });
    let mut queue = EventQueue::new();
    let mut ctx = StrategyContext::new(&market, &portfolio, &mut queue, LotSize::STANDARD);

    let exit = ctx.order_target_shares("A", 0, OrderPrice::Market).unwrap().unwrap();
    assert_eq!(exit.quantity, dec!(-300));

    // Holding is 300 * 20 = 6,000; reaching 10,000 needs 200 more shares.
    let top_up = ctx.order_target_value("A", dec!(10000), OrderPrice::Market).unwrap().unwrap();
    assert_eq!(top_up.quantity, dec!(200));

    assert!(ctx.order_target_shares("A", 350, OrderPrice::Market).unwrap().is_none());
}

#[test]
fn placeholders_are_never_ordered() {
    let mut market = replayer(2, vec![series("LATE", 1, &[dec!(10)])]);
    market.advance().unwrap();
    let portfolio = Portfolio::new(dec!(100000), market.symbols());
    let mut queue = EventQueue::new();
    let mut ctx = StrategyContext::new(&market, &portfolio, &mut queue, LotSize::STANDARD);

    assert!(ctx.order_value("LATE", dec!(5000), OrderPrice::Market).unwrap().is_none());
    assert!(ctx.order_shares("LATE", 100, OrderPrice::Market).unwrap().is_none());
    assert!(queue.is_empty());
}

#[test]
fn crossover_buys_uptrends_and_exits_downtrends() {
    let rising = [dec!(10), dec!(10), dec!(10), dec!(10), dec!(12), dec!(14)];
    let falling = [dec!(14), dec!(14), dec!(14), dec!(14), dec!(12), dec!(10)];
    let mut market = replayer(
        6,
        vec![series("UP", 0, &rising), series("DOWN", 0, &falling)],
    );
    let mut strategy = SmaCrossover::new(SmaCrossoverParams {
        fast_period: 2,
        slow_period: 4,
    })
    .unwrap();
    strategy.initialize(&market).unwrap();

    let mut portfolio = Portfolio::new(dec!(100000), market.symbols());
    portfolio.apply_fill(&Fill {
        symbol: "DOWN".to_string(),
        quantity: 1000,
        price: dec!(14),
        commission: dec!(5),
    });
    let cash = portfolio.available_cash();

    let mut submitted = Vec::new();
    while let Some(event) = market.advance().unwrap() {
        let mut queue = EventQueue::new();
        let mut ctx = StrategyContext::new(&market, &portfolio, &mut queue, LotSize::STANDARD);
        strategy.on_tick(&event, &mut ctx).unwrap();
        submitted.extend(orders(&mut queue).into_iter().map(|o| (event.tick, o)));
    }

    // Nothing until the slow window is full on tick 4, where the means are equal.
    // Tick 5 is the first crossover; the ledger is never updated here, so the
    // signals repeat on tick 6.
    assert!(submitted.iter().all(|(tick, _)| *tick >= 5));
    let (tick, exit) = &submitted[0];
    assert_eq!(*tick, 5);
    assert_eq!(exit.symbol, "DOWN");
    assert_eq!(exit.quantity, dec!(-1000));

    let (_, entry) = &submitted[1];
    assert_eq!(entry.symbol, "UP");
    // All cash into the single buy candidate, sized at the close of 12.
    let expected = LotSize::STANDARD.floor(cash / dec!(12));
    assert_eq!(entry.quantity, Decimal::from(expected));
    assert_eq!(submitted.len(), 4);
}
