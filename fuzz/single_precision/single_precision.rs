#![no_main]

use libfuzzer_sys::fuzz_target;
use num_complex::Complex;
use tukey::{PermutationScheme, PlanOptions, Planner, Tukey};

#[derive(arbitrary::Arbitrary, Debug)]
struct Target {
    size: u16,
    batch: u8,
    radix8: bool,
    re: f32,
    im: f32,
}

fuzz_target!(|data: Target| {
    if data.size == 0 || data.size > 4096 || !data.re.is_finite() || !data.im.is_finite() {
        return;
    }
    if data.re.abs().max(data.im.abs()) > 1e30 {
        return;
    }
    let n = data.size as usize;
    let plan = if data.radix8 {
        match Planner::<f32>::new()
            .plan_with_options(n, PlanOptions::with_scheme(PermutationScheme::Radix8))
        {
            Ok(plan) => plan,
            Err(_) => return,
        }
    } else {
        Tukey::make_plan_f32(n).unwrap()
    };
    let len = n * (data.batch as usize % 4 + 1);
    let src = vec![Complex::new(data.re, data.im); len];
    let mut spectrum = vec![Complex::default(); len];
    plan.forward(&mut spectrum, &src).unwrap();
    let mut restored = vec![Complex::default(); len];
    plan.inverse(&mut restored, &spectrum).unwrap();

    let mut in_place = src.clone();
    plan.forward_in_place(&mut in_place).unwrap();
    let mut scratch = vec![Complex::default(); plan.scratch_length()];
    plan.inverse_in_place_with_scratch(&mut in_place, &mut scratch)
        .unwrap();
    assert_eq!(in_place, restored);

    let value = Complex::new(data.re, data.im);
    let tolerance = n as f32 * (1e-4 * value.norm() + 16. * f32::MIN_POSITIVE);
    for restored in restored.iter() {
        let error = (restored - value * n as f32).norm();
        assert!(
            error <= tolerance,
            "round trip error {error} above {tolerance} for n {n}"
        );
    }
});
