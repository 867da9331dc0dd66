//! Cenário de referência de ponta a ponta: depósito inicial, swap com taxa de
//! rede e rejeição por max spread.
use swap_engine_core::amm::pricing::{min_receive, spot_price};
use swap_engine_core::amm::{
    provide_assets, reverse_simulate, simulate, withdraw_liquidity, AmmErrorCode, AssetInfo, Decimal,
    FeeSchedule, Pool, SwapLimits, TaxPolicy,
};

fn mir() -> AssetInfo {
    AssetInfo::token("terra1mirrortoken")
}

fn uusd() -> AssetInfo {
    AssetInfo::native("uusd")
}

fn fees() -> FeeSchedule {
    FeeSchedule::new(3_000, TaxPolicy::flat(Decimal::permille(1)).unwrap())
}

fn seeded() -> Pool {
    let mut pool = Pool::new(mir(), uusd()).unwrap();
    pool.apply_provide([69_000_000, 420_000_000]).unwrap();
    pool
}

#[test]
fn initial_liquidity_fixture() {
    let mut pool = Pool::new(mir(), uusd()).unwrap();
    let r = pool.apply_provide([69_000_000, 420_000_000]).unwrap();
    assert_eq!(r.lp_shares_issued, 170_235_131);
    assert_eq!(pool.lp_total_supply(), 170_235_131);
    assert_eq!(pool.reserve_amounts(), (69_000_000, 420_000_000));
}

#[test]
fn swap_fixture() {
    let mut pool = seeded();
    let q = pool.apply_swap(&mir().with_amount(1_000_000), SwapLimits::default(), &fees()).unwrap();
    assert_eq!(q.ask_asset, uusd());
    assert_eq!(q.after_fee(), 5_982_000);
    assert_eq!(q.net_amount, 5_976_023);
    assert_eq!(pool.reserve_amounts(), (70_000_000, 414_018_001));
    assert_eq!(pool.lp_total_supply(), 170_235_131);
}

#[test]
fn slippage_rejection_leaves_pool_unchanged() {
    let mut pool = seeded();
    pool.apply_swap(&mir().with_amount(1_000_000), SwapLimits::default(), &fees()).unwrap();
    let before = pool.clone();

    let err = pool
        .apply_swap(&mir().with_amount(50_000_000), SwapLimits::max_spread(Decimal::percent(1)), &fees())
        .unwrap_err();
    assert_eq!(err.code, AmmErrorCode::MaxSpreadExceeded);
    assert!(err.context.contains_key("spread"));
    assert_eq!(pool, before);
    assert_eq!(pool.reserve_amounts(), (70_000_000, 414_018_001));
}

#[test]
fn same_trade_passes_without_limit() {
    let mut pool = seeded();
    pool.apply_swap(&mir().with_amount(1_000_000), SwapLimits::default(), &fees()).unwrap();
    let q = pool.apply_swap(&mir().with_amount(50_000_000), SwapLimits::default(), &fees()).unwrap();
    assert!(q.spread > Decimal::percent(1));
    assert_eq!(pool.reserve_amounts().0, 120_000_000);
}

#[test]
fn simulate_matches_committed_swap() {
    let mut pool = seeded();
    let offer = mir().with_amount(1_000_000);
    let quoted = simulate(&pool, &offer, &fees()).unwrap();
    let executed = pool.apply_swap(&offer, SwapLimits::default(), &fees()).unwrap();
    assert_eq!(quoted, executed);
}

#[test]
fn reverse_simulate_covers_target() {
    let pool = seeded();
    let r = reverse_simulate(&pool, &mir().with_amount(1_000_000), &fees()).unwrap();
    assert_eq!(r.quote.offer_asset, uusd());
    assert!(r.quote.after_fee() >= 1_000_000);
    assert_eq!(r.offer_amount, r.quote.offer_amount);
}

#[test]
fn round_trip_is_not_profitable() {
    let mut pool = seeded();
    let q1 = pool.apply_swap(&mir().with_amount(1_000_000), SwapLimits::default(), &fees()).unwrap();
    let q2 = pool.apply_swap(&uusd().with_amount(q1.net_amount), SwapLimits::default(), &fees()).unwrap();
    assert!(q2.net_amount < 1_000_000);
}

#[test]
fn spot_price_and_min_receive() {
    let pool = seeded();
    let p = spot_price(&pool, &mir()).unwrap();
    assert_eq!(p, Decimal::from_ratio(420, 69).unwrap());
    let q = simulate(&pool, &mir().with_amount(1_000_000), &fees()).unwrap();
    assert_eq!(min_receive(q.net_amount, Decimal::percent(1)).unwrap(), 5_916_262);
}

#[test]
fn deposit_in_reverse_order_then_full_exit() {
    let pool = Pool::new(mir(), uusd()).unwrap();
    let (pool, r) = provide_assets(&pool, &[uusd().with_amount(420_000_000), mir().with_amount(69_000_000)]).unwrap();
    let (emptied, w) = withdraw_liquidity(&pool, r.lp_shares_issued, &TaxPolicy::none()).unwrap();
    assert_eq!(w.gross, [69_000_000, 420_000_000]);
    assert!(emptied.is_empty());
    assert_eq!(emptied.reserve_amounts(), (0, 0));
}

#[test]
fn exempt_native_output_is_untaxed() {
    let uluna = AssetInfo::native("uluna");
    let mut pool = Pool::new(mir(), uluna).unwrap();
    pool.apply_provide([69_000_000, 420_000_000]).unwrap();
    let q = pool.apply_swap(&mir().with_amount(1_000_000), SwapLimits::default(), &fees()).unwrap();
    assert_eq!(q.tax_amount, 0);
    assert_eq!(q.net_amount, 5_982_000);
    assert_eq!(pool.reserve_amounts(), (70_000_000, 414_018_000));
}
