use quickcheck_macros::quickcheck;
use setfam::prelude::*;

fn brute_force(vmax: u16, pred: impl Fn(&[u16]) -> bool) -> Vec<Vec<u16>> {
    let mut out = Vec::new();
    for mask in 0u32..(1u32 << vmax) {
        let s: Vec<u16> = (1..=vmax).filter(|v| mask & (1 << (v - 1)) != 0).collect();
        if pred(&s) {
            out.push(s);
        }
    }
    out
}

fn sorted_subset(vmax: u16, raw: &[u16]) -> Vec<u16> {
    let mut a: Vec<u16> = raw.iter().filter(|&&v| v >= 1 && v <= vmax).copied().collect();
    a.sort_unstable();
    a.dedup();
    a
}

fn collect(engine: &ZddEngine) -> Vec<Vec<u16>> {
    let mut got = Vec::new();
    engine.forall(|s| got.push(s.to_vec())).unwrap();
    got.sort();
    got
}

#[quickcheck]
fn contains_none_matches_brute_force(vmax_raw: u8, raw: Vec<u16>) -> bool {
    let vmax = (vmax_raw % 12 + 1) as u16;
    let a = sorted_subset(vmax, &raw);
    let mut engine = ZddEngine::new(1 << 16);
    engine.set_vmax(vmax).unwrap();
    engine.contains_none(&a).unwrap();
    let mut want = brute_force(vmax, |s| !s.iter().any(|v| a.contains(v)));
    want.sort();
    collect(&engine) == want
}

#[quickcheck]
fn contains_at_least_1_matches_brute_force(vmax_raw: u8, raw: Vec<u16>) -> bool {
    let vmax = (vmax_raw % 12 + 1) as u16;
    let a = sorted_subset(vmax, &raw);
    let mut engine = ZddEngine::new(1 << 16);
    engine.set_vmax(vmax).unwrap();
    engine.contains_at_least_1(&a).unwrap();
    let mut want = brute_force(vmax, |s| s.iter().any(|v| a.contains(v)));
    want.sort();
    collect(&engine) == want
}

#[quickcheck]
fn contains_at_most_1_matches_brute_force(vmax_raw: u8, raw: Vec<u16>) -> bool {
    let vmax = (vmax_raw % 12 + 1) as u16;
    let a = sorted_subset(vmax, &raw);
    let mut engine = ZddEngine::new(1 << 16);
    engine.set_vmax(vmax).unwrap();
    engine.contains_at_most_1(&a).unwrap();
    let mut want = brute_force(vmax, |s| s.iter().filter(|v| a.contains(v)).count() <= 1);
    want.sort();
    collect(&engine) == want
}

#[quickcheck]
fn contains_exactly_1_matches_brute_force(vmax_raw: u8, raw: Vec<u16>) -> bool {
    let vmax = (vmax_raw % 12 + 1) as u16;
    let a = sorted_subset(vmax, &raw);
    let mut engine = ZddEngine::new(1 << 16);
    engine.set_vmax(vmax).unwrap();
    engine.contains_exactly_1(&a).unwrap();
    let mut want = brute_force(vmax, |s| s.iter().filter(|v| a.contains(v)).count() == 1);
    want.sort();
    collect(&engine) == want
}

#[quickcheck]
fn contains_exactly_n_matches_brute_force(vmax_raw: u8, raw: Vec<u16>, n_raw: u8) -> bool {
    let vmax = (vmax_raw % 12 + 1) as u16;
    let a = sorted_subset(vmax, &raw);
    if a.is_empty() {
        return true; // n > 0 would be a documented error case, covered separately
    }
    let n = (n_raw as usize % a.len()) as u32;
    let mut engine = ZddEngine::new(1 << 16);
    engine.set_vmax(vmax).unwrap();
    engine.contains_exactly_n(n, &a).unwrap();
    let mut want = brute_force(vmax, |s| s.iter().filter(|v| a.contains(v)).count() == n as usize);
    want.sort();
    collect(&engine) == want
}

#[quickcheck]
fn powerset_is_every_subset(vmax_raw: u8) -> bool {
    let vmax = (vmax_raw % 12 + 1) as u16;
    let mut engine = ZddEngine::new(1 << 16);
    engine.set_vmax(vmax).unwrap();
    engine.powerset().unwrap();
    let mut want = brute_force(vmax, |_| true);
    want.sort();
    collect(&engine) == want
}
