#![allow(dead_code)]

use std::sync::Arc;

use enhstack::prelude::*;
use rand::{
    Rng,
    SeedableRng,
};
use rand_chacha::ChaCha8Rng;
use rand_distr::{
    Distribution,
    Normal,
};

pub const ENHANCER_LEN: usize = 1001;
pub const PROMOTER_LEN: usize = 301;
pub const FILLER_LEN: usize = 4096;
pub const BASELINE: f64 = 0.1;

pub fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

pub fn random_dna<R: Rng>(
    rng: &mut R,
    length: usize,
) -> Vec<u8> {
    let chars = [b'A', b'C', b'G', b'T'];
    (0..length).map(|_| chars[rng.gen_range(0..4)]).collect()
}

pub fn library(seed: u64) -> ElementLibrary {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    ElementLibrary::try_from_elements(vec![
        Element::new("filler", random_dna(&mut rng, FILLER_LEN)).unwrap(),
        Element::new("enhancer", random_dna(&mut rng, ENHANCER_LEN))
            .unwrap()
            .with_source("chr11:5280500-5281501"),
        Element::new("promoter", random_dna(&mut rng, PROMOTER_LEN)).unwrap(),
    ])
    .unwrap()
}

/// Library whose filler is shuffled for technical replicates > 0.
pub fn replicate_library(
    base: &ElementLibrary,
    replicate: usize,
) -> Arc<ElementLibrary> {
    if replicate == 0 {
        return Arc::new(base.clone());
    }
    let filler = base.get("filler").unwrap().shuffled(replicate as u64);
    Arc::new(base.with_replacement(filler))
}

pub fn find(
    haystack: &[u8],
    needle: &[u8],
) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Toy model: flat baseline, a plateau over the enhancer and a promoter signal
/// decaying exponentially with the enhancer-promoter gap. Noise is seeded
/// from the first bases of the sequence, so replicates with different filler
/// differ.
pub struct DecayPredictor {
    pub enhancer: Vec<u8>,
    pub promoter: Vec<u8>,
    pub bin_size: usize,
    pub decay:    f64,
    pub noise_sd: f64,
}

impl DecayPredictor {
    pub fn new(
        library: &ElementLibrary,
        bin_size: usize,
    ) -> Self {
        Self {
            enhancer: library.get("enhancer").unwrap().sequence().to_vec(),
            promoter: library.get("promoter").unwrap().sequence().to_vec(),
            bin_size,
            decay: 5_000.0,
            noise_sd: 0.005,
        }
    }
}

impl Predictor for DecayPredictor {
    fn predict(
        &self,
        sequence: &[u8],
        _track_kind: &TrackKind,
        _context: &str,
    ) -> anyhow::Result<Vec<f64>> {
        let mut values = vec![BASELINE; sequence.len() / self.bin_size];
        let enhancer = find(sequence, &self.enhancer);
        let promoter = find(sequence, &self.promoter);

        if let Some(start) = enhancer {
            let end = start + self.enhancer.len();
            for v in &mut values[start / self.bin_size..end.div_ceil(self.bin_size)] {
                *v = 0.3;
            }
        }
        if let (Some(e), Some(p)) = (enhancer, promoter) {
            let gap = p.saturating_sub(e + self.enhancer.len()) as f64;
            let level = BASELINE + 0.5 * (-gap / self.decay).exp();

            let seed = sequence[..256]
                .iter()
                .fold(0u64, |h, b| h.wrapping_mul(31).wrapping_add(*b as u64));
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let noise = Normal::new(0.0, self.noise_sd)?;

            let end = p + self.promoter.len();
            for v in &mut values[p / self.bin_size..end.div_ceil(self.bin_size)] {
                *v = (level + noise.sample(&mut rng)).max(0.0);
            }
        }
        Ok(values)
    }
}
