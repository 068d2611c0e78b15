//! Candidate domain generation.
//!
//! Every translation that can serve as a domain label is combined with every
//! selected suffix. Translations are the outer loop and suffixes the inner
//! one, so the output order follows the language roster and then the
//! selection order.
//!
//! # Examples
//!
//! ```
//! use domain_scan_lib::generate::generate_candidates;
//! use domain_scan_lib::Translation;
//!
//! let translations = vec![
//!     Translation::new("English", "Coffee"),
//!     Translation::new("Japanese", "コーヒー"),
//!     Translation::new("German", "kaffee"),
//! ];
//! let tlds = vec!["com".to_string(), "io".to_string()];
//!
//! let candidates = generate_candidates(&translations, &tlds).unwrap();
//! let domains: Vec<_> = candidates.iter().map(|c| c.domain.as_str()).collect();
//! assert_eq!(domains, ["coffee.com", "coffee.io", "kaffee.com", "kaffee.io"]);
//! ```

use crate::error::DomainScanError;
use crate::protocols::registry::normalize_tld;
use crate::types::{DomainCandidate, Translation};
use crate::utils::is_valid_label;

/// Translations usable as domain labels, in input order.
pub fn valid_translations(translations: &[Translation]) -> Vec<&Translation> {
    translations
        .iter()
        .filter(|t| is_valid_label(&t.translation))
        .collect()
}

/// Build the candidate list for a set of translations and suffixes.
///
/// Invalid translations are dropped silently. If none remain the result is
/// `DomainScanError::NoValidTranslations`. Suffixes that normalize to nothing
/// are skipped, as are repeats of a suffix already seen; an empty suffix list
/// yields an empty candidate list.
pub fn generate_candidates(
    translations: &[Translation],
    tlds: &[String],
) -> Result<Vec<DomainCandidate>, DomainScanError> {
    let valid = valid_translations(translations);
    if valid.is_empty() {
        return Err(DomainScanError::NoValidTranslations);
    }

    let mut suffixes: Vec<String> = Vec::with_capacity(tlds.len());
    for suffix in tlds.iter().filter_map(|t| normalize_tld(t)) {
        if !suffixes.contains(&suffix) {
            suffixes.push(suffix);
        }
    }

    let mut candidates = Vec::with_capacity(valid.len() * suffixes.len());
    for translation in valid {
        let label = translation.translation.to_lowercase();
        for suffix in &suffixes {
            candidates.push(DomainCandidate::checking(format!("{}.{}", label, suffix)));
        }
    }

    Ok(candidates)
}
