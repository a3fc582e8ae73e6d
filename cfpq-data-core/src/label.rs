//! Edge label alphabet.
//!
//! Labels become RDF predicate local names when a graph is serialised, so the
//! alphabet only admits symbols that are valid XML names.

use std::{fmt, str::FromStr, sync::Arc};

use rand::Rng;

use crate::error::ParameterError;

/// Symbols used when no alphabet is supplied.
pub const DEFAULT_LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// A single edge label.
///
/// Cloning is cheap; all clones share one allocation.
///
/// # Examples
/// ```
/// use cfpq_data_core::Label;
///
/// let label = Label::new("subClassOf").expect("valid name");
/// assert_eq!(label.as_str(), "subClassOf");
/// assert!(Label::new("1abc").is_err());
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Label(Arc<str>);

impl Label {
    /// Validates `symbol` and wraps it as a label.
    ///
    /// # Errors
    /// Returns [`ParameterError::InvalidLabel`] when `symbol` is empty or is
    /// not a valid XML local name.
    pub fn new(symbol: &str) -> Result<Self, ParameterError> {
        if !is_local_name(symbol) {
            return Err(ParameterError::InvalidLabel {
                label: symbol.to_owned(),
            });
        }
        Ok(Self(Arc::from(symbol)))
    }

    /// Returns the label text.
    #[must_use]
    #[rustfmt::skip]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A non-empty ordered alphabet of distinct labels.
///
/// # Examples
/// ```
/// use cfpq_data_core::LabelSet;
///
/// let labels = LabelSet::default();
/// assert_eq!(labels.len(), 4);
///
/// let custom: LabelSet = "a, b".parse().expect("valid alphabet");
/// assert_eq!(custom.len(), 2);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LabelSet {
    labels: Vec<Label>,
}

impl LabelSet {
    /// Builds an alphabet from the supplied symbols, preserving their order.
    ///
    /// # Errors
    /// Returns [`ParameterError::EmptyLabels`] for an empty input,
    /// [`ParameterError::InvalidLabel`] for a symbol that is not a valid
    /// name, and [`ParameterError::DuplicateLabel`] for a repeated symbol.
    pub fn new<I, S>(symbols: I) -> Result<Self, ParameterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut labels: Vec<Label> = Vec::new();
        for symbol in symbols {
            let label = Label::new(symbol.as_ref())?;
            if labels.contains(&label) {
                return Err(ParameterError::DuplicateLabel {
                    label: label.as_str().to_owned(),
                });
            }
            labels.push(label);
        }
        if labels.is_empty() {
            return Err(ParameterError::EmptyLabels);
        }
        Ok(Self { labels })
    }

    /// Draws one label uniformly at random.
    #[expect(
        clippy::indexing_slicing,
        reason = "index is drawn from 0..len of a non-empty alphabet"
    )]
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &Label {
        let index = rng.gen_range(0..self.labels.len());
        &self.labels[index]
    }

    /// Returns the number of labels in the alphabet.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.labels.len() }

    /// Always `false`; present for API symmetry with collections.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.labels.is_empty() }

    /// Returns `true` when `label` belongs to the alphabet.
    #[must_use]
    pub fn contains(&self, label: &Label) -> bool {
        self.labels.contains(label)
    }

    /// Iterates over labels in alphabet order.
    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    /// Returns the labels as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Label] {
        &self.labels
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS
                .iter()
                .map(|symbol| Label(Arc::from(*symbol)))
                .collect(),
        }
    }
}

impl FromStr for LabelSet {
    type Err = ParameterError;

    /// Parses a comma-separated alphabet such as `"A,B,C"`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::new(
            raw.split(',')
                .map(str::trim)
                .filter(|symbol| !symbol.is_empty()),
        )
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, label) in self.labels.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            f.write_str(label.as_str())?;
        }
        Ok(())
    }
}

fn is_local_name(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    is_name_start_char(first) && chars.all(is_name_char)
}

/// XML 1.0 (fifth edition) `NameStartChar`, without `:`.
const fn is_name_start_char(ch: char) -> bool {
    matches!(ch,
        'A'..='Z'
        | '_'
        | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}'
    )
}

/// XML 1.0 (fifth edition) `NameChar`, without `:`.
const fn is_name_char(ch: char) -> bool {
    is_name_start_char(ch)
        || matches!(ch,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    #[rstest]
    #[case::single_letter("A")]
    #[case::underscore_prefix("_hidden")]
    #[case::camel("subClassOf")]
    #[case::punctuated("type-of.v2")]
    #[case::unicode("étiquette")]
    #[case::middle_dot("a\u{b7}b")]
    fn accepts_local_names(#[case] symbol: &str) {
        let label = Label::new(symbol).expect("label must be accepted");
        assert_eq!(label.as_str(), symbol);
    }

    #[rstest]
    #[case::empty("")]
    #[case::leading_digit("1a")]
    #[case::leading_dash("-a")]
    #[case::whitespace("a b")]
    #[case::markup("a<b")]
    #[case::colon("rdf:type")]
    #[case::superscript_digit("a\u{b2}")]
    #[case::vulgar_fraction("a\u{bc}")]
    #[case::multiplication_sign("a\u{d7}")]
    fn rejects_invalid_names(#[case] symbol: &str) {
        let err = Label::new(symbol).expect_err("label must be rejected");
        assert_eq!(
            err,
            ParameterError::InvalidLabel {
                label: symbol.to_owned()
            }
        );
    }

    #[test]
    fn default_alphabet_is_abcd() {
        let labels = LabelSet::default();
        let symbols: Vec<&str> = labels.iter().map(Label::as_str).collect();
        assert_eq!(symbols, DEFAULT_LABELS);
        assert_eq!(labels.to_string(), "A,B,C,D");
    }

    #[test]
    fn empty_alphabet_is_rejected() {
        let err = LabelSet::new(Vec::<&str>::new()).expect_err("empty must fail");
        assert_eq!(err, ParameterError::EmptyLabels);
        let parsed = " , ".parse::<LabelSet>().expect_err("blank must fail");
        assert_eq!(parsed, ParameterError::EmptyLabels);
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let err = LabelSet::new(["A", "B", "A"]).expect_err("duplicates must fail");
        assert_eq!(
            err,
            ParameterError::DuplicateLabel {
                label: "A".to_owned()
            }
        );
    }

    #[test]
    fn parse_trims_whitespace_and_keeps_order() {
        let labels: LabelSet = " x , y,z ".parse().expect("alphabet must parse");
        let symbols: Vec<&str> = labels.iter().map(Label::as_str).collect();
        assert_eq!(symbols, ["x", "y", "z"]);
    }

    #[test]
    fn choose_covers_every_label() {
        let labels = LabelSet::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let label = labels.choose(&mut rng);
            let position = labels
                .iter()
                .position(|candidate| candidate == label)
                .expect("chosen label must come from the alphabet");
            seen[position] = true;
        }
        assert!(seen.iter().all(|hit| *hit));
    }
}
