//! Rule-based German annotator.
//!
//! Tokenization is a single regex pass. Sentence boundaries are terminal
//! punctuation followed by whitespace and a sentence opener, guarded against
//! common abbreviations, initials and ordinals. Tags come from a closed-class
//! lexicon first, then from capitalization (German nouns are capitalized) and
//! suffix heuristics for the open classes.

use super::{Annotator, DEFAULT_MODEL};
use crate::error::{Error, Result};
use crate::model::{PosTag, Token};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

static RE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ['’](?i:tis|em|ts|ll|ve|re|[smdt])\b
        | \p{N}+(?:[.,:/]\p{N}+)*\p{L}*
        | [\p{L}\p{M}]+(?:-[\p{L}\p{M}]+)*
        | \.{2,}
        | [–—-]+
        | \S
        ",
    )
    .unwrap()
});

// Closed-class words, one tag per table.
const DETERMINERS: &str = "der die das dem den des ein eine einem einen einer eines \
    kein keine keinem keinen keiner keines dieser diese dieses diesem diesen \
    jener jene jenes jenem jenen jeder jede jedes jedem jeden mancher manche \
    manches manchem manchen welcher welche welches welchem welchen alle allen aller \
    solche solcher solches solchen";
const PRONOUNS: &str = "ich du er sie es wir ihr mich dich sich mir dir ihm ihn uns euch \
    ihnen man jemand niemand nichts etwas wer was mein meine meinem meinen meiner \
    meines dein deine deinem deinen deiner deines sein seine seinem seinen seiner \
    seines unser unsere unserem unseren unserer euer eure eurem euren eurer ihre \
    ihrem ihren ihrer ihres selbst einander derselbe dieselbe dasselbe";
const ADPOSITIONS: &str = "in an auf aus bei mit nach von zu über unter vor hinter neben \
    zwischen durch für gegen ohne um bis seit wegen trotz statt gegenüber entlang \
    außer innerhalb außerhalb im am ins zum zur vom beim ans aufs ums durchs fürs";
const COORDINATORS: &str = "und oder aber denn sondern sowie noch";
const SUBORDINATORS: &str = "dass daß weil wenn als ob obwohl obgleich damit während \
    bevor ehe nachdem sobald solange sodass indem falls wie";
const AUXILIARIES: &str = "bin bist ist sind seid war warst waren wart gewesen wäre wären \
    habe hast hat haben habt hatte hattest hatten hattet gehabt hätte hätten \
    werde wirst wird werden werdet wurde wurdest wurden würde würden geworden \
    kann kannst können könnt konnte konnten könnte könnten muss muß musst mußt \
    müssen müsst musste mußte mussten mußten müsste müßte soll sollst sollen \
    sollte sollten will willst wollen wollte wollten darf darfst dürfen durfte \
    durften dürfte mag magst mögen mochte möchte möchten";
const PARTICLES: &str = "nicht ja nein";
const INTERJECTIONS: &str = "ach oh ah ha he hm nun na ei o pfui juchhe";
const ADVERBS: &str = "auch noch schon nur sehr so dann da dort hier immer nie niemals \
    wieder jetzt bald oft ganz gar doch mal eben fast kaum wohl gern gerne heute \
    gestern morgen sogar etwa dabei darauf darum deshalb daher dennoch trotzdem \
    zuerst endlich plötzlich vielleicht wirklich eigentlich bereits allein leider \
    hin her herein hinaus heraus zurück vorbei weg fort zusammen überall nirgends \
    irgendwo nirgendwo warum wo wohin woher wann weshalb sonst ebenfalls lange";
const NUMERALS: &str = "null eins zwei drei vier fünf sechs sieben acht neun zehn elf \
    zwölf zwanzig dreißig hundert tausend million";
const ADJECTIVES: &str = "gut alt neu groß klein lang kurz jung schön hoch tief weit nah \
    still leise laut warm kalt hell dunkel voll leer arm reich frei schwer leicht";

const ABBREVIATIONS: &[&str] = &[
    "z.b", "d.h", "u.a", "usw", "bzw", "vgl", "ca", "dr", "hr", "fr", "st", "nr", "prof", "s",
    "u", "u.s.w", "etc", "geb", "gest", "bd", "hrsg", "jh", "jhd", "str",
];

const ADVERB_SUFFIXES: &[&str] = &["weise", "wärts", "mals", "dings", "lings"];
const ADJECTIVE_SUFFIXES: &[&str] = &[
    "lich", "ig", "isch", "bar", "sam", "los", "haft", "voll", "reich", "arm", "artig",
];
const INFLECTION_ENDINGS: &[&str] = &["en", "em", "er", "es", "e"];
const VERB_SUFFIXES: &[&str] = &["en", "ern", "eln", "te", "ten", "test", "tet", "st", "t"];

const OPENERS: &[&str] = &["„", "\"", "»", "«", "‚", "'", "(", "–", "—", "-", ":"];

static BUILTIN: LazyLock<Lexicon> = LazyLock::new(|| {
    let mut lexicon = Lexicon::default();
    let tables = [
        (DETERMINERS, PosTag::Det),
        (PRONOUNS, PosTag::Pron),
        (ADPOSITIONS, PosTag::Adp),
        (COORDINATORS, PosTag::Cconj),
        (SUBORDINATORS, PosTag::Sconj),
        (AUXILIARIES, PosTag::Aux),
        (PARTICLES, PosTag::Part),
        (INTERJECTIONS, PosTag::Intj),
        (ADVERBS, PosTag::Adv),
        (NUMERALS, PosTag::Num),
        (ADJECTIVES, PosTag::Adj),
    ];
    for (words, tag) in tables {
        for word in words.split_whitespace() {
            // First table wins for words listed twice ("während", "noch").
            lexicon.entries.entry(word.to_string()).or_insert(tag);
        }
    }
    lexicon
});

/// Word-to-tag dictionary consulted before the heuristic rules.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, PosTag>,
}

impl Lexicon {
    /// The built-in German closed-class lexicon.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Parses `word<TAB>TAG` lines. Blank lines and `#` comments are skipped.
    pub fn parse(content: &str) -> Result<Self> {
        let mut entries = HashMap::new();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (word, tag) = line.split_once('\t').ok_or_else(|| {
                Error::InvalidData(format!("lexicon line {}: expected word<TAB>TAG", line_no + 1))
            })?;
            entries.insert(word.trim().to_string(), PosTag::from_label(tag));
        }
        Ok(Self { entries })
    }

    /// Reads a lexicon file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Adds or overrides entries.
    pub fn extend(&mut self, other: Lexicon) {
        self.entries.extend(other.entries);
    }

    /// Looks up an exact surface form.
    pub fn get(&self, word: &str) -> Option<PosTag> {
        self.entries.get(word).copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the lexicon has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pure-Rust annotator for German prose.
#[derive(Debug, Clone)]
pub struct RuleAnnotator {
    lexicon: Lexicon,
}

impl Default for RuleAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleAnnotator {
    /// Creates an annotator with the built-in lexicon.
    pub fn new() -> Self {
        Self {
            lexicon: Lexicon::builtin(),
        }
    }

    /// Creates an annotator whose built-in lexicon is extended by `extra`.
    pub fn with_lexicon(extra: Lexicon) -> Self {
        let mut lexicon = Lexicon::builtin();
        lexicon.extend(extra);
        Self { lexicon }
    }

    fn tag(&self, word: &str, sentence_initial: bool) -> PosTag {
        if !word.chars().any(char::is_alphanumeric) {
            return if word.chars().all(is_symbol) {
                PosTag::Sym
            } else {
                PosTag::Punct
            };
        }

        let first = word.chars().next().unwrap_or(' ');
        if first.is_numeric() {
            return PosTag::Num;
        }
        if first == '\'' || first == '’' {
            return PosTag::Pron;
        }

        if let Some(tag) = self.lexicon.get(word) {
            return tag;
        }

        let lower = word.to_lowercase();
        let capitalized = first.is_uppercase();
        if let Some(tag) = self.lexicon.get(&lower) {
            if !capitalized || sentence_initial || is_closed_class(tag) {
                return tag;
            }
        }

        if capitalized && !sentence_initial {
            return PosTag::Noun;
        }
        if ADVERB_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
            return PosTag::Adv;
        }
        if has_adjective_stem(&lower) {
            return PosTag::Adj;
        }
        if capitalized {
            return PosTag::Noun;
        }
        if VERB_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
            return PosTag::Verb;
        }
        // Unknown mid-sentence lowercase words are mostly strong verb forms.
        if sentence_initial {
            PosTag::Adj
        } else {
            PosTag::Verb
        }
    }
}

impl Annotator for RuleAnnotator {
    fn model(&self) -> &str {
        DEFAULT_MODEL
    }

    fn annotate(&self, text: &str) -> Result<Vec<Token>> {
        let spans = sentence_spans(text);
        let mut tokens: Vec<Token> = Vec::new();
        let mut sentence = 0;
        let mut previous_sentence = usize::MAX;

        for m in RE_TOKEN.find_iter(text) {
            while sentence + 1 < spans.len() && m.start() >= spans[sentence + 1].0 {
                sentence += 1;
            }
            let sentence_initial = sentence != previous_sentence
                || tokens
                    .last()
                    .is_some_and(|t| OPENERS.contains(&t.text.as_str()));
            previous_sentence = sentence;

            let pos = self.tag(m.as_str(), sentence_initial);
            tokens.push(Token::new(m.as_str(), m.start(), pos, sentence));
        }

        Ok(tokens)
    }

    fn split_sentences(&self, paragraph: &str) -> Result<Vec<String>> {
        Ok(sentence_spans(paragraph)
            .into_iter()
            .map(|(start, end)| paragraph[start..end].trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }
}

/// Byte spans of the sentences in `text`.
fn sentence_spans(text: &str) -> Vec<(usize, usize)> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut spans = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        if !is_terminal(chars[i].1) {
            i += 1;
            continue;
        }

        let terminal = i;
        let mut j = i + 1;
        while j < chars.len() && (is_terminal(chars[j].1) || is_closer(chars[j].1)) {
            j += 1;
        }
        let mut k = j;
        while k < chars.len() && chars[k].1.is_whitespace() {
            k += 1;
        }

        let boundary = k > j
            && k < chars.len()
            && opens_sentence(chars[k].1)
            && !(chars[terminal].1 == '.' && is_abbreviation(&text[..chars[terminal].0]));

        if boundary {
            let end = chars.get(j).map_or(text.len(), |(b, _)| *b);
            spans.push((start, end));
            start = chars[k].0;
            i = k;
        } else {
            i = j;
        }
    }

    if start < text.len() && !text[start..].trim().is_empty() {
        spans.push((start, text.len()));
    }
    spans
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '“' | '”' | '«' | '»' | '\'' | '’' | ')' | ']')
}

fn opens_sentence(c: char) -> bool {
    c.is_uppercase()
        || c.is_numeric()
        || matches!(c, '„' | '"' | '»' | '«' | '‚' | '\'' | '(' | '–' | '—' | '-')
}

/// Checks the word right before a period.
fn is_abbreviation(before: &str) -> bool {
    let word = before
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .trim_start_matches(|c: char| !c.is_alphanumeric());
    if word.is_empty() {
        return false;
    }

    let mut chars = word.chars();
    let single_initial =
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase());
    let ordinal = word.len() <= 2 && word.chars().all(|c| c.is_ascii_digit());

    single_initial || ordinal || ABBREVIATIONS.contains(&word.to_lowercase().as_str())
}

fn has_adjective_stem(lower: &str) -> bool {
    let stems = std::iter::once(lower).chain(
        INFLECTION_ENDINGS
            .iter()
            .filter_map(|ending| lower.strip_suffix(ending)),
    );
    for stem in stems {
        if ADJECTIVE_SUFFIXES.iter().any(|s| stem.ends_with(s)) {
            return true;
        }
    }
    false
}

fn is_symbol(c: char) -> bool {
    matches!(
        c,
        '§' | '$' | '%' | '&' | '+' | '=' | '€' | '£'
            | '*' | '#' | '@' | '°' | '<' | '>' | '|' | '~'
    )
}

fn is_closed_class(tag: PosTag) -> bool {
    matches!(
        tag,
        PosTag::Det
            | PosTag::Pron
            | PosTag::Adp
            | PosTag::Cconj
            | PosTag::Sconj
            | PosTag::Aux
            | PosTag::Part
            | PosTag::Intj
            | PosTag::Num
    )
}
