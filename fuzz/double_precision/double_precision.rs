#![no_main]

use libfuzzer_sys::fuzz_target;
use num_complex::Complex;
use tukey::{FeatureSet, Planner};

#[derive(arbitrary::Arbitrary, Debug)]
struct Target {
    forward: bool,
    scalar: bool,
    size: u16,
    re: f64,
    im: f64,
}

fuzz_target!(|data: Target| {
    if data.size == 0 || data.size > 4096 || !data.re.is_finite() || !data.im.is_finite() {
        return;
    }
    let features = if data.scalar {
        FeatureSet::scalar_only()
    } else {
        FeatureSet::current()
    };
    let plan = Planner::<f64>::with_features(features)
        .plan(data.size as usize)
        .unwrap();
    let src = vec![Complex::new(data.re, data.im); data.size as usize];
    let mut dst = vec![Complex::default(); data.size as usize];
    let mut scratch = vec![Complex::default(); plan.scratch_length()];
    if data.forward {
        plan.forward_with_scratch(&mut dst, &src, &mut scratch).unwrap();
    } else {
        plan.inverse_with_scratch(&mut dst, &src, &mut scratch).unwrap();
    }
    let mut chunk = src.clone();
    if data.forward {
        plan.forward_in_place(&mut chunk).unwrap();
    } else {
        plan.inverse_in_place(&mut chunk).unwrap();
    }
    assert_eq!(chunk, dst);
});
