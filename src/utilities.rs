use crate::candidates::is_well_formed;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

#[cfg(test)]
pub mod test_utilities;

/// read a word list with one word per line. words are trimmed and lowercased; anything
/// that is still not a plain lowercase word of at least three letters is left out.
pub fn read_word_list<P: AsRef<Path>>(word_list_file_path: P) -> io::Result<Vec<String>> {
    let file = File::open(word_list_file_path)?;
    let mut words = Vec::new();
    for line in io::BufReader::new(file).lines() {
        let word = line?.trim().to_lowercase();
        if is_well_formed(&word) {
            words.push(word);
        }
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDLIST_FILE_PATH: &str = "tests/wordlist.txt";
    const DNE_FILE_PATH: &str = "tests/DNE";

    #[test]
    fn test_read_word_list() {
        let words = read_word_list(WORDLIST_FILE_PATH).unwrap();

        // hardcode expected contents - there is a risk of erroneous divergence
        // here, but we avoid the risk of replicating errors in I/O.
        assert_eq!(
            words,
            vec!["adgjbehk", "kcfil", "adgjbehkcfil", "kcf", "fil", "fade", "jad"]
        );
    }

    #[test]
    fn test_read_word_list_file_dne() {
        let error = read_word_list(DNE_FILE_PATH).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::NotFound);
    }
}
