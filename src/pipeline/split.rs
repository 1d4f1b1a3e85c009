use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Result, SosensError};

/// Indexy trénovacej a testovacej množiny
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Stratifikované rozdelenie: z každej triedy ide do testu zaokrúhlený podiel
/// `test_fraction`, najmenej jedna a najviac `count - 1` vzoriek.
pub fn stratified_split(y: &[usize], n_classes: usize, test_fraction: f64, seed: u64) -> Result<Split> {
    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for (i, &c) in y.iter().enumerate() {
        if c >= n_classes {
            return Err(SosensError::Training(format!("class index {} out of range", c)));
        }
        by_class[c].push(i);
    }

    if let Some((class, members)) = by_class.iter().enumerate().find(|(_, m)| m.len() < 2) {
        return Err(SosensError::Training(format!(
            "class {} has {} sample(s); stratified split needs at least 2 per class",
            class,
            members.len()
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(y.len());
    let mut test = Vec::new();
    for members in &mut by_class {
        members.shuffle(&mut rng);
        let n_test = ((members.len() as f64 * test_fraction).round() as usize).clamp(1, members.len() - 1);
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }
    train.sort_unstable();
    test.sort_unstable();

    Ok(Split { train, test })
}
