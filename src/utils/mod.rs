//! Utility functions and helpers.

use indicatif::{ProgressBar, ProgressStyle};
use rand::RngCore;

/// Generate `bytes` random bytes as a lowercase hex string.
///
/// Upload keys are prefixed with these so repeated runs never collide;
/// ten bytes gives a twenty character prefix.
pub fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

/// Standard progress bar for upload and download loops.
pub fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("#>-"),
    );
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_hex_has_requested_width() {
        assert_eq!(random_hex(10).len(), 20);
        assert_eq!(random_hex(1).len(), 2);
        assert_eq!(random_hex(0).len(), 0);
    }

    #[test]
    fn random_hex_is_lowercase_hex() {
        let value = random_hex(16);
        assert!(value
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn random_hex_varies_between_calls() {
        assert_ne!(random_hex(16), random_hex(16));
    }
}
