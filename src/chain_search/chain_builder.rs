use crate::candidates::Candidate;
use crate::letter_set::LetterSet;
use crate::puzzle::Puzzle;

/// greedily build one chain from `pool`, taking words out of the pool as they are used.
/// returns None if the superset is not covered within `par` words.
pub fn build_chain<'c>(
    puzzle: &Puzzle,
    pool: &mut Vec<&'c Candidate>,
    par: usize,
) -> Option<Vec<&'c Candidate>> {
    // kept in superset order; the relaxed selection truncates it from the end
    let mut remaining: Vec<char> = puzzle.superset().chars().collect();
    let mut chain: Vec<&'c Candidate> = Vec::new();

    loop {
        if remaining.is_empty() {
            return Some(chain);
        }
        if chain.len() == par {
            return None;
        }

        let idx = select_next(chain.last().copied(), &remaining, pool)?;
        let word = pool.remove(idx);
        let letters = word.letters();
        remaining.retain(|c| !letters.contains(*c));
        chain.push(word);
    }
}

/// pick the index of the next word in `pool`.
///
/// the first word of a chain is simply the head of the pool. after that the word
/// must start with the last letter of `last` and is the first word (in pool order)
/// covering all of `remaining`; failing that, the first covering `remaining` minus
/// its last letter, then minus its last two letters, and so on down to a single letter.
pub fn select_next(
    last: Option<&Candidate>,
    remaining: &[char],
    pool: &[&Candidate],
) -> Option<usize> {
    let Some(last) = last else {
        return if pool.is_empty() { None } else { Some(0) };
    };
    let link = last.last_letter();

    for keep in (1..=remaining.len()).rev() {
        let target: LetterSet = remaining[..keep].iter().copied().collect();
        let found = pool
            .iter()
            .position(|c| c.first_letter() == link && c.letters().is_superset(&target));
        if found.is_some() {
            return found;
        }
    }

    None
}
