use rand::Rng;

use crate::contract::BatchSpec;

pub const SUFFIX_LENGTH: usize = 8;
pub const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Source of the per-invocation suffix shared by every bucket in a batch.
pub trait SuffixSource {
    fn next_suffix(&self) -> String;
}

impl<F> SuffixSource for F
where
    F: Fn() -> String,
{
    fn next_suffix(&self) -> String {
        self()
    }
}

/// Draws suffixes from the thread-local generator.
///
/// Not cryptographically secure. The suffix only has to keep names from
/// colliding across stack updates, and a collision surfaces as a
/// `BucketAlreadyExists` failure from the provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSuffix;

impl SuffixSource for ThreadRngSuffix {
    fn next_suffix(&self) -> String {
        random_suffix(&mut rand::thread_rng())
    }
}

pub fn random_suffix(rng: &mut impl Rng) -> String {
    (0..SUFFIX_LENGTH)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}

/// `{prefix}{sequence:03}-{suffix}`; sequences start at 1.
pub fn bucket_name(prefix: &str, sequence: u32, suffix: &str) -> String {
    format!("{prefix}{sequence:03}-{suffix}")
}

pub fn bucket_names(spec: &BatchSpec, suffix: &str) -> Vec<String> {
    (1..=spec.count)
        .map(|sequence| bucket_name(&spec.prefix, sequence, suffix))
        .collect()
}
