//! Property tests for evaluation invariants.
//!
//! Uses proptest to verify:
//! 1. Length contract: success iff n > lookback, then every output has n - lookback samples
//! 2. Averages stay inside the window they summarize
//! 3. Bounded oscillators stay inside their ranges
//! 4. Band ordering and crossing consistency

use proptest::prelude::*;

use indikit_core::{registry, EngineError};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_prices(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..1000.0_f64, 0..max_len)
}

/// (high, low, close) bars with low <= close <= high.
fn arb_bars(max_len: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>, Vec<f64>)> {
    prop::collection::vec((10.0..500.0_f64, 0.0..20.0_f64, 0.0..1.0_f64), 1..max_len).prop_map(
        |bars| {
            let mut high = Vec::with_capacity(bars.len());
            let mut low = Vec::with_capacity(bars.len());
            let mut close = Vec::with_capacity(bars.len());
            for (base, spread, pos) in bars {
                low.push(base);
                high.push(base + spread);
                close.push(base + spread * pos);
            }
            (high, low, close)
        },
    )
}

fn arb_period() -> impl Strategy<Value = usize> {
    1usize..20
}

// ── 1. Length Contract ───────────────────────────────────────────────

proptest! {
    /// Single-period indicators over `real` succeed exactly when n > lookback.
    #[test]
    fn length_contract(x in arb_prices(80), p in arb_period()) {
        let period = p as f64;
        let ids = [
            "sma", "ema", "wma", "dema", "tema", "trima", "kama", "rsi", "cmo", "stddev", "mom",
            "zlema", "trix", "md", "stderr",
        ];
        for id in ids {
            let lookback = registry().lookup(id).unwrap().lookback(&[period]).unwrap();
            match registry().evaluate(id, &[&x], &[period]) {
                Ok(r) => {
                    prop_assert!(
                        x.len() > lookback,
                        "{} accepted n={} with lookback {}",
                        id,
                        x.len(),
                        lookback
                    );
                    prop_assert_eq!(r.lookback(), lookback);
                    prop_assert_eq!(r.outputs()[0].len(), x.len() - lookback);
                }
                Err(EngineError::InsufficientData { required, actual, .. }) => {
                    prop_assert!(x.len() <= lookback);
                    prop_assert_eq!(required, lookback + 1);
                    prop_assert_eq!(actual, x.len());
                }
                Err(other) => prop_assert!(false, "{}: unexpected error {:?}", id, other),
            }
        }
    }
}

// ── 2. Averages Inside Their Window ──────────────────────────────────

proptest! {
    /// SMA and WMA never leave [min, max] of the window they cover.
    #[test]
    fn averages_stay_in_window(x in arb_prices(80), p in arb_period()) {
        prop_assume!(x.len() > p);
        for id in ["sma", "wma", "trima"] {
            let r = registry().evaluate(id, &[&x], &[p as f64]).unwrap();
            for (k, &v) in r.outputs()[0].iter().enumerate() {
                let i = r.input_index(k);
                let window = &x[i + 1 - p..=i];
                let lo = window.iter().cloned().fold(f64::INFINITY, f64::min);
                let hi = window.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(
                    v >= lo - 1e-9 && v <= hi + 1e-9,
                    "{}[{}] = {} outside [{}, {}]",
                    id,
                    k,
                    v,
                    lo,
                    hi
                );
            }
        }
    }

    /// Constant input is a fixed point of every moving average.
    #[test]
    fn constant_input_is_preserved(c in 1.0..1000.0_f64, p in arb_period()) {
        let x = vec![c; 3 * p + 10];
        for id in ["sma", "ema", "wma", "dema", "tema", "trima", "wilders", "kama"] {
            let r = registry().evaluate(id, &[&x], &[p as f64]).unwrap();
            for &v in &r.outputs()[0] {
                prop_assert!((v - c).abs() <= 1e-9 * c, "{}: {} != {}", id, v, c);
            }
        }
    }
}

// ── 3. Bounded Oscillators ───────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_and_cmo_are_bounded(x in arb_prices(80), p in arb_period()) {
        prop_assume!(x.len() > p);
        let rsi = registry().evaluate("rsi", &[&x], &[p as f64]).unwrap();
        prop_assert!(rsi.outputs()[0].iter().all(|v| (-1e-9..=100.0 + 1e-9).contains(v)));
        let cmo = registry().evaluate("cmo", &[&x], &[p as f64]).unwrap();
        prop_assert!(cmo.outputs()[0].iter().all(|v| (-100.0 - 1e-9..=100.0 + 1e-9).contains(v)));
    }

    #[test]
    fn range_oscillators_are_bounded((high, low, close) in arb_bars(60), p in 1usize..10) {
        prop_assume!(high.len() > 3 * p);
        let hlc: [&[f64]; 3] = [&high, &low, &close];

        let willr = registry().evaluate("willr", &hlc, &[p as f64]).unwrap();
        prop_assert!(willr.outputs()[0].iter().all(|v| (-100.0 - 1e-9..=1e-9).contains(v)));

        let stoch = registry().evaluate("stoch", &hlc, &[p as f64, 1.0, 1.0]).unwrap();
        for series in stoch.outputs() {
            prop_assert!(series.iter().all(|v| (-1e-9..=100.0 + 1e-9).contains(v)));
        }

        let aroon = registry().evaluate("aroon", &[&high, &low], &[p as f64]).unwrap();
        for series in aroon.outputs() {
            prop_assert!(series.iter().all(|v| (0.0..=100.0 + 1e-9).contains(v)));
        }
    }
}

// ── 4. Bands and Crossings ───────────────────────────────────────────

proptest! {
    #[test]
    fn bbands_are_ordered(x in arb_prices(80), p in arb_period(), k in 0.0..4.0_f64) {
        prop_assume!(x.len() >= p);
        let r = registry().evaluate("bbands", &[&x], &[p as f64, k]).unwrap();
        let (lower, middle, upper) = (&r.outputs()[0], &r.outputs()[1], &r.outputs()[2]);
        for i in 0..r.len() {
            prop_assert!(lower[i] <= middle[i] + 1e-9);
            prop_assert!(middle[i] <= upper[i] + 1e-9);
        }
    }

    /// Every upward cross is also a cross in some direction.
    #[test]
    fn crossover_implies_crossany(a in arb_prices(60), shift in -50.0..50.0_f64) {
        prop_assume!(a.len() >= 2);
        let b: Vec<f64> = a.iter().rev().map(|v| v + shift).collect();
        let over = registry().evaluate("crossover", &[&a, &b], &[]).unwrap();
        let any = registry().evaluate("crossany", &[&a, &b], &[]).unwrap();
        for (o, y) in over.outputs()[0].iter().zip(&any.outputs()[0]) {
            prop_assert!(*o == 0.0 || *o == 1.0);
            prop_assert!(*o <= *y);
        }
    }

    #[test]
    fn add_is_commutative(a in arb_prices(40), b in arb_prices(40)) {
        let n = a.len().min(b.len());
        prop_assume!(n > 0);
        let (a, b) = (&a[..n], &b[..n]);
        let ab = registry().evaluate("add", &[a, b], &[]).unwrap();
        let ba = registry().evaluate("add", &[b, a], &[]).unwrap();
        prop_assert_eq!(ab.outputs(), ba.outputs());
    }
}
