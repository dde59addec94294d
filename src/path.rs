//! # Path Addressing
//!
//! A `Path` names a location inside nested form data as an ordered list of segments, each
//! either a field name or an array index.  Paths parse from the familiar dot/bracket notation:
//!
//! ```rust
//! use formstate::{Path, Segment};
//!
//! let path: Path = "contacts[2].email".parse().unwrap();
//! assert_eq!(
//!     path.segments(),
//!     &[
//!         Segment::Key("contacts".to_string()),
//!         Segment::Index(2),
//!         Segment::Key("email".to_string()),
//!     ]
//! );
//! assert_eq!(path.to_string(), "contacts.2.email");
//! ```
//!
//! [`get_path`] reads through a path and [`set_path`] writes through one.  Writes never touch
//! their input: every container from the root down to the written leaf is a fresh copy while
//! everything off that spine is shared with the input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::PathError;
use crate::form_value::{FormMap, FormValue};

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// A field name inside an object.
    Key(String),
    /// A position inside an array.
    Index(usize),
}

impl Segment {
    fn from_dotted(name: String) -> Self {
        match parse_index(&name) {
            Some(index) => Segment::Index(index),
            None => Segment::Key(name),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

// Canonical array indexes only: "0", "7", "12" but not "01" or "+1".
fn parse_index(text: &str) -> Option<usize> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if text.len() > 1 && text.starts_with('0') {
        return None;
    }
    text.parse().ok()
}

/// A location within form data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty path, addressing the whole value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns this path extended by a field name.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(key.into()));
        self
    }

    /// Returns this path extended by an array index.
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    /// Appends a segment in place.
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Returns a path made of this path followed by `other`.
    pub fn join(&self, other: &Path) -> Path {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Path { segments }
    }

    /// The segments in order from the root.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True for the empty path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Same as [`Path::is_root`].
    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// The path with its last segment removed, or `None` at the root.
    pub fn parent(&self) -> Option<Path> {
        let (_, init) = self.segments.split_last()?;
        Some(Path {
            segments: init.to_vec(),
        })
    }

    /// The last segment, or `None` at the root.
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// True when `prefix` names this location or one of its ancestors.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Path { segments }
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Path {
            segments: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Index(index) if position == 0 => write!(f, "{}", index)?,
                Segment::Index(index) => write!(f, ".{}", index)?,
                Segment::Key(key) if is_bare_key(key) => {
                    if position > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", key)?;
                }
                Segment::Key(key) => {
                    write!(f, "[\"")?;
                    for c in key.chars() {
                        if c == '"' || c == '\\' {
                            write!(f, "\\")?;
                        }
                        write!(f, "{}", c)?;
                    }
                    write!(f, "\"]")?;
                }
            }
        }
        Ok(())
    }
}

fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && parse_index(key).is_none()
        && !key.contains(['.', '[', ']', '"', '\''])
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        PathParser::new(text).parse()
    }
}

struct PathParser<'a> {
    text: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl<'a> PathParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<Path, PathError> {
        let mut segments = Vec::new();
        let mut name = String::new();
        let mut name_start = 0;
        let mut closed_bracket = false;

        while let Some(&(offset, c)) = self.chars.get(self.pos) {
            match c {
                '.' => {
                    if closed_bracket {
                        closed_bracket = false;
                    } else if name.is_empty() {
                        return Err(self.empty_segment(name_start));
                    } else {
                        segments.push(Segment::from_dotted(std::mem::take(&mut name)));
                    }
                    name_start = offset + 1;
                    self.pos += 1;
                    if self.pos == self.chars.len() {
                        return Err(self.empty_segment(self.text.len()));
                    }
                }
                '[' => {
                    if !name.is_empty() {
                        segments.push(Segment::from_dotted(std::mem::take(&mut name)));
                    } else if !closed_bracket && self.pos != 0 {
                        return Err(self.empty_segment(name_start));
                    }
                    segments.push(self.bracket()?);
                    closed_bracket = true;
                }
                ']' => return Err(self.unexpected(c)),
                _ if closed_bracket => return Err(self.unexpected(c)),
                _ => {
                    name.push(c);
                    self.pos += 1;
                }
            }
        }

        if !name.is_empty() {
            segments.push(Segment::from_dotted(name));
        }
        Ok(Path { segments })
    }

    // Parses `[...]` starting at the opening bracket and leaves `pos` after the closing one.
    fn bracket(&mut self) -> Result<Segment, PathError> {
        self.pos += 1;
        let quote = match self.chars.get(self.pos) {
            Some(&(_, q)) if q == '"' || q == '\'' => q,
            _ => return self.bracket_index(),
        };
        self.pos += 1;

        let mut key = String::new();
        loop {
            let Some(&(_, c)) = self.chars.get(self.pos) else {
                return Err(self.unterminated());
            };
            self.pos += 1;
            match c {
                '\\' => match self.chars.get(self.pos) {
                    Some(&(_, escaped)) => {
                        key.push(escaped);
                        self.pos += 1;
                    }
                    None => return Err(self.unterminated()),
                },
                c if c == quote => break,
                c => key.push(c),
            }
        }

        match self.chars.get(self.pos) {
            Some(&(_, ']')) => {
                self.pos += 1;
                Ok(Segment::Key(key))
            }
            Some(_) => Err(PathError::InvalidBracket {
                path: self.text.to_string(),
                segment: key,
            }),
            None => Err(self.unterminated()),
        }
    }

    fn bracket_index(&mut self) -> Result<Segment, PathError> {
        let mut contents = String::new();
        loop {
            match self.chars.get(self.pos) {
                Some(&(_, ']')) => {
                    self.pos += 1;
                    break;
                }
                Some(&(_, c)) => {
                    contents.push(c);
                    self.pos += 1;
                }
                None => return Err(self.unterminated()),
            }
        }
        match parse_index(&contents) {
            Some(index) => Ok(Segment::Index(index)),
            None => Err(PathError::InvalidBracket {
                path: self.text.to_string(),
                segment: contents,
            }),
        }
    }

    fn empty_segment(&self, offset: usize) -> PathError {
        PathError::EmptySegment {
            path: self.text.to_string(),
            offset,
        }
    }

    fn unterminated(&self) -> PathError {
        PathError::UnterminatedBracket {
            path: self.text.to_string(),
        }
    }

    fn unexpected(&self, found: char) -> PathError {
        PathError::UnexpectedCharacter {
            path: self.text.to_string(),
            found,
        }
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Resolves `path` inside `data`.
///
/// Returns `None` when any segment along the way is absent.  An index segment applied to an
/// object looks up the decimal field name; a field segment applied to an array never matches.
pub fn get_path<'a>(data: &'a FormValue, path: &Path) -> Option<&'a FormValue> {
    let mut current = data;
    for segment in path.segments() {
        current = match (segment, current) {
            (Segment::Key(key), FormValue::Object(entries)) => entries.get(key)?,
            (Segment::Index(index), FormValue::Array(items)) => items.get(*index)?,
            (Segment::Index(index), FormValue::Object(entries)) => {
                entries.get(&index.to_string())?
            }
            _ => return None,
        };
    }
    Some(current)
}

/// The furthest past the end of an array that [`set_path`] will write.
pub const MAX_INDEX_GAP: usize = 1024;

/// Returns a copy of `data` with `value` written at `path`.
///
/// Missing or primitive intermediates are replaced by an empty object, or an empty array when
/// the next segment is an index.  Writing past the end of an array pads it with
/// `FormValue::Undefined`, but only up to [`MAX_INDEX_GAP`] padding cells; a write further out
/// than that is dropped and `data` comes back unchanged.  Writing at the root path returns
/// `value` itself.
pub fn set_path(data: &FormValue, path: &Path, value: FormValue) -> FormValue {
    set_at(Some(data), path.segments(), value).unwrap_or_else(|| {
        tracing::warn!(path = %path, "ignoring write too far past the end of an array");
        data.clone()
    })
}

fn set_at(
    current: Option<&FormValue>,
    segments: &[Segment],
    value: FormValue,
) -> Option<FormValue> {
    let Some((head, rest)) = segments.split_first() else {
        return Some(value);
    };
    match (head, current) {
        (Segment::Key(key), current) => {
            let entries = match current {
                Some(FormValue::Object(entries)) => (**entries).clone(),
                _ => FormMap::new(),
            };
            set_entry(entries, key.clone(), rest, value)
        }
        (Segment::Index(index), Some(FormValue::Object(entries))) => {
            set_entry((**entries).clone(), index.to_string(), rest, value)
        }
        (Segment::Index(index), current) => {
            let index = *index;
            let mut items = match current {
                Some(FormValue::Array(items)) => items.to_vec(),
                _ => Vec::new(),
            };
            if index >= items.len() {
                if index - items.len() > MAX_INDEX_GAP {
                    return None;
                }
                items.resize(index.checked_add(1)?, FormValue::Undefined);
            }
            let child = set_at(Some(&items[index]), rest, value)?;
            items[index] = child;
            Some(FormValue::array(items))
        }
    }
}

fn set_entry(
    mut entries: FormMap,
    key: String,
    rest: &[Segment],
    value: FormValue,
) -> Option<FormValue> {
    let child = set_at(entries.get(&key), rest, value)?;
    entries.insert(key, child);
    Some(FormValue::object(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(text: &str) -> Path {
        text.parse().unwrap()
    }

    #[test]
    fn parse_dotted() {
        assert_eq!(
            path("address.street"),
            Path::root().key("address").key("street")
        );
        assert_eq!(
            path("contacts.2.email"),
            Path::root().key("contacts").index(2).key("email")
        );
    }

    #[test]
    fn parse_brackets() {
        assert_eq!(
            path("contacts[2].email"),
            Path::root().key("contacts").index(2).key("email")
        );
        assert_eq!(path("[0][1]"), Path::root().index(0).index(1));
        assert_eq!(
            path("a[\"b.c\"].d"),
            Path::root().key("a").key("b.c").key("d")
        );
        assert_eq!(path("a['x']"), Path::root().key("a").key("x"));
    }

    #[test]
    fn parse_root() {
        assert!(path("").is_root());
        assert_eq!(Path::root().to_string(), "");
    }

    #[test]
    fn leading_zero_is_a_key() {
        assert_eq!(path("a.01"), Path::root().key("a").key("01"));
        assert_eq!(path("a.0"), Path::root().key("a").index(0));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            "a..b".parse::<Path>(),
            Err(PathError::EmptySegment { offset: 2, .. })
        ));
        assert!(matches!(
            "a.".parse::<Path>(),
            Err(PathError::EmptySegment { .. })
        ));
        assert!(matches!(
            ".a".parse::<Path>(),
            Err(PathError::EmptySegment { offset: 0, .. })
        ));
        assert!(matches!(
            "a[1".parse::<Path>(),
            Err(PathError::UnterminatedBracket { .. })
        ));
        assert!(matches!(
            "a[x]".parse::<Path>(),
            Err(PathError::InvalidBracket { .. })
        ));
        for padded in ["a[ 2 ]", "a[+2]", "a[02]", "a[]"] {
            assert!(
                matches!(padded.parse::<Path>(), Err(PathError::InvalidBracket { .. })),
                "{} parsed",
                padded
            );
        }
        assert!(matches!(
            "a[1]b".parse::<Path>(),
            Err(PathError::UnexpectedCharacter { found: 'b', .. })
        ));
    }

    #[test]
    fn display_round_trips_awkward_keys() {
        let awkward = Path::root().key("a.b").key("2").index(3).key("say \"hi\"");
        let text = awkward.to_string();
        assert_eq!(text, r#"["a.b"]["2"].3["say \"hi\""]"#);
        assert_eq!(path(&text), awkward);
    }

    #[test]
    fn parent_last_and_prefix() {
        let p = path("contacts.2.email");
        assert_eq!(p.parent(), Some(path("contacts.2")));
        assert_eq!(p.last(), Some(&Segment::Key("email".to_string())));
        assert!(p.starts_with(&path("contacts")));
        assert!(p.starts_with(&Path::root()));
        assert!(!p.starts_with(&path("contacts.1")));
        assert_eq!(Path::root().parent(), None);
    }

    #[test]
    fn serde_as_string() {
        let p = path("a.0.b");
        assert_eq!(serde_json::to_value(&p).unwrap(), json!("a.0.b"));
        let back: Path = serde_json::from_value(json!("a[0].b")).unwrap();
        assert_eq!(back, p);
        assert!(serde_json::from_value::<Path>(json!("a..b")).is_err());
    }

    #[test]
    fn get_resolves_nested() {
        let data = FormValue::from(json!({"contacts": [{"email": "a@b"}, {"email": "c@d"}]}));
        assert_eq!(
            get_path(&data, &path("contacts.1.email")),
            Some(&FormValue::from("c@d"))
        );
        assert_eq!(get_path(&data, &Path::root()), Some(&data));
    }

    #[test]
    fn get_misses_return_none() {
        let data = FormValue::from(json!({"address": {"street": "Main"}, "list": [1]}));
        assert_eq!(get_path(&data, &path("address.city")), None);
        assert_eq!(get_path(&data, &path("nowhere.street")), None);
        assert_eq!(get_path(&data, &path("list.5")), None);
        assert_eq!(get_path(&data, &path("list.name")), None);
        assert_eq!(get_path(&data, &path("address.street.more")), None);
    }

    #[test]
    fn set_writes_leaf() {
        let data = FormValue::from(json!({"address": {"street": "Main", "city": "Springfield"}}));
        let updated = set_path(&data, &path("address.street"), FormValue::from("Elm"));
        assert_eq!(
            updated.to_json(),
            json!({"address": {"street": "Elm", "city": "Springfield"}})
        );
        assert_eq!(
            data.to_json(),
            json!({"address": {"street": "Main", "city": "Springfield"}})
        );
    }

    #[test]
    fn set_creates_intermediates() {
        let data = FormValue::empty_object();
        let updated = set_path(&data, &path("contacts.1.email"), FormValue::from("x@y"));
        assert_eq!(updated.to_json(), json!({"contacts": [null, {"email": "x@y"}]}));
        assert_eq!(
            get_path(&updated, &path("contacts.0")),
            Some(&FormValue::Undefined)
        );
    }

    #[test]
    fn set_replaces_primitive_intermediate() {
        let data = FormValue::from(json!({"a": "text"}));
        let updated = set_path(&data, &path("a.b"), FormValue::from(1));
        assert_eq!(updated.to_json(), json!({"a": {"b": 1}}));
    }

    #[test]
    fn set_index_on_object_uses_decimal_key() {
        let data = FormValue::from(json!({"a": {"0": "zero"}}));
        let updated = set_path(&data, &path("a.0"), FormValue::from("new"));
        assert_eq!(updated.to_json(), json!({"a": {"0": "new"}}));
        assert_eq!(
            get_path(&updated, &path("a.0")),
            Some(&FormValue::from("new"))
        );
    }

    #[test]
    fn set_far_past_the_end_is_dropped() {
        let data = FormValue::from(json!({"list": []}));
        let updated = set_path(
            &data,
            &Path::root().key("list").index(usize::MAX),
            FormValue::from(1),
        );
        assert!(updated.ptr_eq(&data));

        let updated = set_path(&data, &path("list.100000000000"), FormValue::from(1));
        assert!(updated.ptr_eq(&data));
        let updated = set_path(&data, &path("list.100000000000.name"), FormValue::from(1));
        assert!(updated.ptr_eq(&data));
    }

    #[test]
    fn set_pads_up_to_the_gap_limit() {
        let data = FormValue::from(json!({"list": ["a"]}));
        let reach = 1 + MAX_INDEX_GAP;
        let updated = set_path(
            &data,
            &Path::root().key("list").index(reach),
            FormValue::from("b"),
        );
        let items = updated.get_field("list").and_then(FormValue::as_array).unwrap();
        assert_eq!(items.len(), reach + 1);
        assert_eq!(items[reach], FormValue::from("b"));

        let updated = set_path(
            &data,
            &Path::root().key("list").index(reach + 1),
            FormValue::from("b"),
        );
        assert!(updated.ptr_eq(&data));
    }

    #[test]
    fn set_root_replaces_everything() {
        let data = FormValue::from(json!({"a": 1}));
        let updated = set_path(&data, &Path::root(), FormValue::from(2));
        assert_eq!(updated, FormValue::from(2));
    }

    #[test]
    fn set_shares_untouched_subtrees() {
        let data = FormValue::from(json!({
            "address": {"street": "Main"},
            "contacts": [{"email": "a"}, {"email": "b"}],
            "tags": ["x"]
        }));
        let updated = set_path(&data, &path("contacts.1.email"), FormValue::from("c"));

        for untouched in ["address", "tags", "contacts.0"] {
            let before = get_path(&data, &path(untouched)).unwrap();
            let after = get_path(&updated, &path(untouched)).unwrap();
            assert!(before.ptr_eq(after), "{} was copied", untouched);
        }
        for spine in ["", "contacts", "contacts.1"] {
            let before = get_path(&data, &path(spine)).unwrap();
            let after = get_path(&updated, &path(spine)).unwrap();
            assert!(!before.ptr_eq(after), "{} was not copied", spine);
        }
    }
}
