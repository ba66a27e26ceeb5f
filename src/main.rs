//! Prediction Market Core Simulation.
//!
//! Demonstrates the full engine lifecycle: market creation, impact-driven
//! pricing, trading, resolution, settlement, and the emergency/recovery
//! escape hatches.

use lmsr_core::*;

const ADMIN: UserId = UserId(1);

fn main() {
    println!("Multi-Outcome Market Maker Engine Simulation");
    println!("Integer LMSR Pricing, Single Writer, Full Lifecycle\n");

    scenario_1_pricing();
    scenario_2_trading_and_coupling();
    scenario_3_resolution_and_settlement();
    scenario_4_emergency_and_recovery();
    scenario_5_batch_resolution();

    println!("\nAll simulations completed successfully.");
}

fn funded_engine(users: &[UserId]) -> Engine {
    let mut engine = Engine::new(ADMIN, EngineConfig::default());
    for &user in users {
        engine
            .deposit(user, Amount::new(100 * TOTAL_PRICE))
            .unwrap();
    }
    engine
}

/// Fresh market pricing and unit quotes.
fn scenario_1_pricing() {
    println!("Scenario 1: Pricing a Fresh Market\n");

    let mut engine = funded_engine(&[]);
    let market = engine
        .create_market(
            ADMIN,
            vec!["YES".to_string(), "NO".to_string()],
            vec![Amount::new(500_000), Amount::new(500_000)],
            ImpactMode::Linear,
        )
        .unwrap();

    let info = engine.get_market_info(market).unwrap();
    for outcome in &info.outcomes {
        println!("  {} priced at {}", outcome.name, outcome.price);
    }

    let unit = engine.quote_buy(market, OutcomeId(0), 1).unwrap();
    let five = engine.quote_buy(market, OutcomeId(0), 5).unwrap();
    println!("  first YES share quoted at {unit}");
    println!("  five YES shares quoted at {five} (impact compounds per unit)\n");
}

/// Buys move every outcome's price through the shared weight sum.
fn scenario_2_trading_and_coupling() {
    println!("Scenario 2: Trading and Cross-Outcome Coupling\n");

    let alice = UserId(10);
    let bob = UserId(11);
    let mut engine = funded_engine(&[alice, bob]);
    let market = engine
        .create_market(
            ADMIN,
            vec!["RED".to_string(), "GREEN".to_string(), "BLUE".to_string()],
            vec![
                Amount::new(400_000),
                Amount::new(300_000),
                Amount::new(300_000),
            ],
            ImpactMode::Quadratic,
        )
        .unwrap();

    let cost = engine.buy(alice, market, OutcomeId(0), 20).unwrap();
    println!("  Alice buys 20 RED for {cost}");

    let info = engine.get_market_info(market).unwrap();
    for outcome in &info.outcomes {
        println!("  {} now priced at {}", outcome.name, outcome.price);
    }
    let sum: u128 = info.outcomes.iter().map(|o| o.price.value()).sum();
    println!("  price sum {sum} (TOTAL_PRICE {TOTAL_PRICE}, truncation bounded)");

    let returned = engine.sell(alice, market, OutcomeId(0), 20).unwrap();
    println!("  Alice sells all 20 back for {returned} (round trip, no fee)");

    let cost = engine.buy(bob, market, OutcomeId(2), 7).unwrap();
    println!("  Bob buys 7 BLUE for {cost}\n");
}

/// Resolution pays the pool to winning holders per share, floor division.
fn scenario_3_resolution_and_settlement() {
    println!("Scenario 3: Resolution and Settlement\n");

    let alice = UserId(10);
    let bob = UserId(11);
    let mut engine = funded_engine(&[alice, bob]);
    let market = engine
        .create_market(
            ADMIN,
            vec!["YES".to_string(), "NO".to_string()],
            vec![Amount::new(500_000), Amount::new(500_000)],
            ImpactMode::Linear,
        )
        .unwrap();

    engine.buy(alice, market, OutcomeId(0), 12).unwrap();
    engine.buy(bob, market, OutcomeId(0), 4).unwrap();
    engine.buy(bob, market, OutcomeId(1), 9).unwrap();

    let pool = engine.get_market_info(market).unwrap().prize_pool;
    println!("  prize pool after trading: {pool}");

    engine.resolve(ADMIN, market, OutcomeId(0)).unwrap();
    println!("  admin resolves YES");

    let alice_payout = engine.withdraw(alice, market).unwrap();
    let bob_payout = engine.withdraw(bob, market).unwrap();
    println!("  Alice claims {alice_payout} for 12 winning shares");
    println!("  Bob claims {bob_payout} for 4 winning shares");
    println!("  dust left in escrow: {}\n", engine.escrow());
}

/// Emergency blocks trading only; recovery pays recorded volume.
fn scenario_4_emergency_and_recovery() {
    println!("Scenario 4: Emergency Pause and Recovery\n");

    let carol = UserId(20);
    let mut engine = funded_engine(&[carol]);
    let market = engine
        .create_market(
            ADMIN,
            vec!["UP".to_string(), "DOWN".to_string()],
            vec![Amount::new(500_000), Amount::new(500_000)],
            ImpactMode::Linear,
        )
        .unwrap();

    engine.buy(carol, market, OutcomeId(0), 3).unwrap();
    engine.declare_emergency(ADMIN, true).unwrap();

    let blocked = engine.buy(carol, market, OutcomeId(0), 1);
    println!("  buy during emergency: {:?}", blocked.unwrap_err());

    let recovered = engine.recovery_user_funds(carol).unwrap();
    println!("  Carol recovers her full recorded volume: {recovered}");

    engine.declare_emergency(ADMIN, false).unwrap();
    engine.buy(carol, market, OutcomeId(0), 1).unwrap();
    println!("  trading resumes after the all-clear\n");
}

/// Batch resolution is all-or-nothing.
fn scenario_5_batch_resolution() {
    println!("Scenario 5: Batch Resolution Atomicity\n");

    let mut engine = funded_engine(&[]);
    let mut ids = Vec::new();
    for i in 0..3 {
        let id = engine
            .create_market(
                ADMIN,
                vec![format!("A{i}"), format!("B{i}")],
                vec![Amount::new(500_000), Amount::new(500_000)],
                ImpactMode::Linear,
            )
            .unwrap();
        ids.push(id);
    }

    let bad_batch = vec![
        (ids[0], OutcomeId(0)),
        (MarketId(99), OutcomeId(0)),
        (ids[2], OutcomeId(1)),
    ];
    let err = engine.batch_resolve(ADMIN, &bad_batch).unwrap_err();
    println!("  batch with unknown id rejected: {err}");
    for &id in &ids {
        let status = engine.get_market_info(id).unwrap().status;
        println!("  market {:?} still {:?}", id, status);
    }

    let good_batch: Vec<_> = ids.iter().map(|&id| (id, OutcomeId(0))).collect();
    engine.batch_resolve(ADMIN, &good_batch).unwrap();
    println!("  clean batch resolves all {} markets", ids.len());
}
