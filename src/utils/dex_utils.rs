#![forbid(unsafe_code)]

use sha1::{Digest, Sha1};

// ***************************************************************************
//                                Constants
// ***************************************************************************
// First-generation species count, the default hashing modulus.
pub const FIRST_GEN_SPECIES : u64 = 151;

// ***************************************************************************
// GENERAL PUBLIC FUNCTIONS
// ***************************************************************************
// ---------------------------------------------------------------------------
// pokemon_id:
// ---------------------------------------------------------------------------
/** Deterministically map a name to a Pokémon identifier in [1, modulus].
 *
 * The mapping is SHA-1 over the UTF-8 bytes of the name, the first 8 digest
 * bytes interpreted as a big-endian unsigned 64-bit integer, reduced modulo
 * the given modulus and shifted to a 1-based identifier.  Every name,
 * including the empty string, maps to a valid identifier.
 *
 * The digest algorithm and byte order are load-bearing: changing either
 * changes the perceived "Pokémon of a name" for every existing user.
 *
 * The modulus must be nonzero.
 */
pub fn pokemon_id(name: &str, modulus: u64) -> u64 {
    debug_assert!(modulus > 0, "pokemon_id modulus must be nonzero");
    let digest = Sha1::digest(name.as_bytes());
    let mut lead = [0u8; 8];
    lead.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(lead) % modulus + 1
}

// ---------------------------------------------------------------------------
// title_case:
// ---------------------------------------------------------------------------
/** Uppercase the first character of a string, leaving the rest unchanged.
 * No-op on the empty string.  Backs the template's titlecase filter.
 */
pub fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_in_range() {
        for name in ["pikachu", "cafard", "", "a", "Mewtwo Returns!", "ééé"] {
            let id = pokemon_id(name, FIRST_GEN_SPECIES);
            assert!((1..=FIRST_GEN_SPECIES).contains(&id), "{} out of range for {:?}", id, name);
        }
    }

    #[test]
    fn id_is_deterministic() {
        for name in ["pikachu", "cafard", ""] {
            assert_eq!(pokemon_id(name, FIRST_GEN_SPECIES), pokemon_id(name, FIRST_GEN_SPECIES));
        }
    }

    // SHA-1("") = da39a3ee5e6b4b0d..., leading 8 bytes 0xda39a3ee5e6b4b0d.
    #[test]
    fn id_of_empty_string() {
        assert_eq!(pokemon_id("", FIRST_GEN_SPECIES), 122);
    }

    // SHA-1("pikachu") = e4409822ba1d95be..., leading 8 bytes 0xe4409822ba1d95be.
    #[test]
    fn id_of_pikachu() {
        assert_eq!(pokemon_id("pikachu", FIRST_GEN_SPECIES), 53);
    }

    // The default name used when the query parameter is absent.
    #[test]
    fn id_of_cafard() {
        assert_eq!(pokemon_id("cafard", FIRST_GEN_SPECIES), 97);
    }

    #[test]
    fn id_with_modulus_one() {
        assert_eq!(pokemon_id("anything", 1), 1);
    }

    #[test]
    #[should_panic(expected = "modulus must be nonzero")]
    fn id_with_modulus_zero_panics() {
        pokemon_id("anything", 0);
    }

    #[test]
    fn title_case_basic() {
        assert_eq!(title_case("pikachu"), "Pikachu");
        assert_eq!(title_case("hit points"), "Hit points");
        assert_eq!(title_case("X"), "X");
    }

    #[test]
    fn title_case_empty_is_noop() {
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn title_case_multibyte_first_char() {
        assert_eq!(title_case("émeraude"), "Émeraude");
    }
}
