use rand::Rng;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;

pub const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &[u8] = b"0123456789";
pub const SYMBOLS: &[u8] = b"!#$%&()*+";

const LETTER_COUNT: (usize, usize) = (8, 10);
const DIGIT_COUNT: (usize, usize) = (2, 4);
const SYMBOL_COUNT: (usize, usize) = (2, 4);

/// Generates a 12-18 character password: 8-10 letters, 2-4 digits and
/// 2-4 symbols, shuffled together.
pub fn generate() -> String {
    generate_with(&mut OsRng)
}

pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut chars = Vec::with_capacity(LETTER_COUNT.1 + DIGIT_COUNT.1 + SYMBOL_COUNT.1);
    push_random(rng, &mut chars, LETTERS, LETTER_COUNT);
    push_random(rng, &mut chars, DIGITS, DIGIT_COUNT);
    push_random(rng, &mut chars, SYMBOLS, SYMBOL_COUNT);
    chars.shuffle(rng);
    chars.into_iter().map(char::from).collect()
}

fn push_random<R: Rng + ?Sized>(
    rng: &mut R,
    out: &mut Vec<u8>,
    charset: &[u8],
    (min, max): (usize, usize),
) {
    let count = rng.gen_range(min..=max);
    out.extend((0..count).map(|_| *charset.choose(&mut *rng).expect("non-empty charset")));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn counts(password: &str) -> (usize, usize, usize) {
        let letters = password.bytes().filter(|b| LETTERS.contains(b)).count();
        let digits = password.bytes().filter(|b| DIGITS.contains(b)).count();
        let symbols = password.bytes().filter(|b| SYMBOLS.contains(b)).count();
        (letters, digits, symbols)
    }

    #[test]
    fn composition_holds_over_many_runs() {
        for _ in 0..1000 {
            let password = generate();
            let len = password.chars().count();
            assert!((12..=18).contains(&len), "bad length {len}: {password}");
            let (letters, digits, symbols) = counts(&password);
            assert!((8..=10).contains(&letters), "letters {letters}: {password}");
            assert!((2..=4).contains(&digits), "digits {digits}: {password}");
            assert!((2..=4).contains(&symbols), "symbols {symbols}: {password}");
            assert_eq!(letters + digits + symbols, len);
        }
    }

    #[test]
    fn seeded_rng_is_deterministic() {
        let a = generate_with(&mut StdRng::seed_from_u64(7));
        let b = generate_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn lengths_cover_the_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 19];
        for _ in 0..5000 {
            seen[generate_with(&mut rng).len()] = true;
        }
        assert!(seen[12] && seen[18], "extremes never produced");
    }

    #[test]
    fn every_charset_member_can_be_drawn() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut out = Vec::new();
        for _ in 0..200 {
            push_random(&mut rng, &mut out, SYMBOLS, SYMBOL_COUNT);
        }
        assert!(out.iter().all(|b| SYMBOLS.contains(b)));
        for symbol in SYMBOLS {
            assert!(out.contains(symbol), "{} never drawn", *symbol as char);
        }
    }

    #[test]
    fn symbol_set_has_nine_members() {
        assert_eq!(LETTERS.len(), 52);
        assert_eq!(DIGITS.len(), 10);
        assert_eq!(SYMBOLS.len(), 9);
    }
}
