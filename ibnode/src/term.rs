//! Graph terms: named nodes, literals, blank nodes, and triples.
//!
//! The node kinds are a closed sum type. Subjects get their own type so a
//! literal can never appear in subject position, and predicates are always
//! [`Iri`]s.

use std::fmt;

use serde::{Deserialize, Serialize};

/// `xsd:string`, the datatype of plain literals.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
/// `rdf:langString`, the datatype of language-tagged literals.
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// A named node (IRI).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    /// Creates a named node. The IRI is taken as-is; no normalization.
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Returns the IRI text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Iri {
    fn from(iri: &str) -> Self {
        Self::new(iri)
    }
}

impl From<String> for Iri {
    fn from(iri: String) -> Self {
        Self(iri)
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// A graph-local blank node label.
///
/// Labels only distinguish blank nodes within one graph. They never enter a
/// computed identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlankId(String);

impl BlankId {
    /// Creates a blank node label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlankId {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for BlankId {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl fmt::Display for BlankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// A literal: lexical value, datatype, and optional language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    value: String,
    datatype: Iri,
    language: Option<String>,
}

impl Literal {
    /// A plain literal (`xsd:string`).
    pub fn simple(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: Iri::new(XSD_STRING),
            language: None,
        }
    }

    /// A typed literal.
    pub fn typed(value: impl Into<String>, datatype: impl Into<Iri>) -> Self {
        Self {
            value: value.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    /// A language-tagged literal (`rdf:langString`). The tag is lower-cased.
    pub fn lang(value: impl Into<String>, language: impl AsRef<str>) -> Self {
        Self {
            value: value.into(),
            datatype: Iri::new(RDF_LANG_STRING),
            language: Some(language.as_ref().to_ascii_lowercase()),
        }
    }

    /// Lexical value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Datatype IRI.
    #[must_use]
    pub fn datatype(&self) -> &Iri {
        &self.datatype
    }

    /// Language tag, lower-cased.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)?;
        match &self.language {
            Some(lang) => write!(f, "@{lang}"),
            None if self.datatype.as_str() == XSD_STRING => Ok(()),
            None => write!(f, "^^{}", self.datatype),
        }
    }
}

/// Any node that can appear in object position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Node {
    /// A named node.
    Named(Iri),
    /// A literal value.
    Literal(Literal),
    /// A blank node.
    Blank(BlankId),
}

impl Node {
    /// Shorthand for a named node.
    pub fn named(iri: impl Into<String>) -> Self {
        Node::Named(Iri::new(iri))
    }

    /// Shorthand for a blank node.
    pub fn blank(label: impl Into<String>) -> Self {
        Node::Blank(BlankId::new(label))
    }

    /// Shorthand for a plain literal.
    pub fn literal(value: impl Into<String>) -> Self {
        Node::Literal(Literal::simple(value))
    }

    /// Returns the blank label if this is a blank node.
    #[must_use]
    pub fn as_blank(&self) -> Option<&BlankId> {
        match self {
            Node::Blank(b) => Some(b),
            _ => None,
        }
    }

    /// Whether this is a blank node.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }
}

impl From<Iri> for Node {
    fn from(iri: Iri) -> Self {
        Node::Named(iri)
    }
}

impl From<Literal> for Node {
    fn from(lit: Literal) -> Self {
        Node::Literal(lit)
    }
}

impl From<BlankId> for Node {
    fn from(b: BlankId) -> Self {
        Node::Blank(b)
    }
}

impl From<Subject> for Node {
    fn from(s: Subject) -> Self {
        match s {
            Subject::Named(iri) => Node::Named(iri),
            Subject::Blank(b) => Node::Blank(b),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Named(iri) => iri.fmt(f),
            Node::Literal(lit) => lit.fmt(f),
            Node::Blank(b) => b.fmt(f),
        }
    }
}

/// A node in subject position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subject {
    /// A named subject.
    Named(Iri),
    /// An anonymous subject.
    Blank(BlankId),
}

impl Subject {
    /// Shorthand for a named subject.
    pub fn named(iri: impl Into<String>) -> Self {
        Subject::Named(Iri::new(iri))
    }

    /// Shorthand for a blank subject.
    pub fn blank(label: impl Into<String>) -> Self {
        Subject::Blank(BlankId::new(label))
    }

    /// Returns the blank label if this is a blank subject.
    #[must_use]
    pub fn as_blank(&self) -> Option<&BlankId> {
        match self {
            Subject::Blank(b) => Some(b),
            Subject::Named(_) => None,
        }
    }
}

impl From<Iri> for Subject {
    fn from(iri: Iri) -> Self {
        Subject::Named(iri)
    }
}

impl From<BlankId> for Subject {
    fn from(b: BlankId) -> Self {
        Subject::Blank(b)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Named(iri) => iri.fmt(f),
            Subject::Blank(b) => b.fmt(f),
        }
    }
}

/// A subject–predicate–object edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    /// Subject.
    pub subject: Subject,
    /// Predicate.
    pub predicate: Iri,
    /// Object.
    pub object: Node,
}

impl Triple {
    /// Creates a triple.
    pub fn new(
        subject: impl Into<Subject>,
        predicate: impl Into<Iri>,
        object: impl Into<Node>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Whether the subject or the object is blank.
    #[must_use]
    pub fn has_blank(&self) -> bool {
        self.subject.as_blank().is_some() || self.object.is_blank()
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
