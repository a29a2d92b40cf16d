//! Parser decomposing a syllable skeleton into onset, nucleus and coda.
//!
//! The input is the tone-less, lowercase skeleton of the in-progress word
//! (modified vowels like `ê` or `ư` included). Two onsets need lookahead:
//! `gi` is a consonant cluster only when a vowel follows (`gia`), otherwise
//! the `i` is the nucleus (`gì`), and the `u` of `qu` belongs to the onset.
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_while},
    IResult, Parser,
};

use crate::util::is_vowel;

/// Borrowed view of the three syllable parts.
#[derive(Debug, PartialEq)]
pub struct SyllableParts<'a> {
    pub onset: &'a str,
    pub nucleus: &'a str,
    pub coda: &'a str,
}

fn onset(input: &str) -> IResult<&str, &str> {
    if input.starts_with("gi") && !input.chars().nth(2).is_some_and(is_vowel) {
        return tag("g").parse(input);
    }
    alt((tag("gi"), tag("qu"), take_till(is_vowel))).parse(input)
}

fn vowel_run(input: &str) -> IResult<&str, &str> {
    take_while(is_vowel).parse(input)
}

/// Split a skeleton into onset / nucleus / coda. Never fails: a string with
/// no vowel parses as pure onset.
pub fn split_syllable(input: &str) -> SyllableParts<'_> {
    let (rest, onset) = onset(input).unwrap_or((input, ""));
    let (coda, nucleus) = vowel_run(rest).unwrap_or((rest, ""));
    SyllableParts { onset, nucleus, coda }
}
