// demos/scenario_demo.rs
use tracing_subscriber::EnvFilter;
use vanilla_bs::{
    greek, greeks, price, sweep, Greek, OptionParam, Portfolio, PricingError, ShockFlags, Shocks,
    VanillaOption,
};

fn main() -> Result<(), PricingError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("vanilla-bs Scenario Demo");
    println!("========================\n");

    // 1. A single option
    let call = VanillaOption::try_new(100.0, 100.0, 1.0, 0.2, 0.05, 0.0, Default::default())?;
    println!("{}\n", call);
    println!("Price = {:.4}\n", price(&call));
    println!("{}\n", greeks(&call));

    // 2. A long straddle and its risk
    let straddle = Portfolio::from_options([call, call.flipped()]);
    println!("Straddle price = {:.4}", price(&straddle));
    println!("Straddle Greeks:\n{}\n", greeks(&straddle));

    // 3. Spot ladder
    println!("{:>8} {:>12} {:>12} {:>12}", "Spot", "Price", "Delta", "Gamma");
    let spots: Vec<f64> = (0..=8).map(|i| 80.0 + 5.0 * i as f64).collect();
    let prices = sweep(&straddle, "S", &spots, price)?;
    let deltas = sweep(&straddle, "S", &spots, |p| greek(p, Greek::Delta))?;
    let gammas = sweep(&straddle, "S", &spots, |p| greek(p, Greek::Gamma))?;
    for (i, spot) in spots.iter().enumerate() {
        println!("{:>8.2} {:>12.4} {:>12.4} {:>12.6}", spot, prices[i], deltas[i], gammas[i]);
    }

    // 4. Vol-up stress, 25% relative
    let stressed = straddle.shocked(
        &Shocks::single(OptionParam::Volatility, 25.0),
        ShockFlags::PERCENTAGE,
    );
    println!(
        "\nVol +25% P&L = {:.4}",
        price(&stressed) - price(&straddle)
    );

    // 5. Payoff at expiry
    let payoff = straddle.payoff();
    println!(
        "Payoff grid: {} points, min {:.2}, max {:.2}",
        payoff.len(),
        payoff.iter().cloned().fold(f64::INFINITY, f64::min),
        payoff.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    );

    // 6. Unknown parameter names are rejected
    match sweep(&straddle, "vol", &[0.3], price) {
        Ok(_) => println!("\nUnexpected: should have failed!"),
        Err(e) => println!("\nCaught error: {}", e),
    }

    Ok(())
}
