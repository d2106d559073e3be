//! Conversion from [sophia](https://docs.rs/sophia_api) graphs.

use sophia_api::graph::Graph as SophiaGraph;
use sophia_api::term::{Term, TermKind};
use sophia_api::triple::Triple as SophiaTriple;

use crate::error::{Error, Result};
use crate::term::{BlankId, Iri, Literal, Node, Subject, Triple};
use crate::Graph;

impl Graph {
    /// Copies every triple of a sophia graph.
    ///
    /// ```
    /// use ibnode::Graph;
    /// use sophia_api::source::TripleSource;
    /// use sophia_inmem::graph::LightGraph;
    ///
    /// let parsed: LightGraph = sophia_turtle::parser::turtle::parse_str(
    ///     "<http://example.org/a> <http://example.org/p> [ <http://example.org/q> 1 ] .",
    /// )
    /// .collect_triples()
    /// .unwrap();
    /// let graph = Graph::from_sophia(&parsed).unwrap();
    /// assert_eq!(graph.len(), 2);
    /// assert_eq!(graph.blank_nodes().len(), 1);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::Source`] if the graph fails to yield a triple, and
    /// [`Error::UnsupportedTerm`] for quoted triples, variables, or a
    /// non-IRI predicate.
    pub fn from_sophia<G: SophiaGraph>(graph: &G) -> Result<Self> {
        let mut out = Graph::new();
        for triple in graph.triples() {
            let triple = triple.map_err(|e| Error::Source(e.to_string()))?;
            out.insert(Triple {
                subject: subject(triple.s())?,
                predicate: iri(triple.p(), "predicate")?,
                object: object(triple.o())?,
            });
        }
        Ok(out)
    }
}

fn unsupported<T: Term + std::fmt::Debug>(term: &T, position: &'static str) -> Error {
    Error::UnsupportedTerm {
        position,
        term: format!("{term:?}"),
    }
}

fn iri<T: Term + std::fmt::Debug>(term: T, position: &'static str) -> Result<Iri> {
    match term.iri() {
        Some(iri) => Ok(Iri::new(iri.as_str())),
        None => Err(unsupported(&term, position)),
    }
}

fn blank<T: Term + std::fmt::Debug>(term: &T, position: &'static str) -> Result<BlankId> {
    match term.bnode_id() {
        Some(id) => Ok(BlankId::new(id.as_str())),
        None => Err(unsupported(term, position)),
    }
}

fn subject<T: Term + std::fmt::Debug>(term: T) -> Result<Subject> {
    match term.kind() {
        TermKind::Iri => iri(term, "subject").map(Subject::Named),
        TermKind::BlankNode => blank(&term, "subject").map(Subject::Blank),
        _ => Err(unsupported(&term, "subject")),
    }
}

fn object<T: Term + std::fmt::Debug>(term: T) -> Result<Node> {
    match term.kind() {
        TermKind::Iri => iri(term, "object").map(Node::Named),
        TermKind::BlankNode => blank(&term, "object").map(Node::Blank),
        TermKind::Literal => {
            let Some(value) = term.lexical_form() else {
                return Err(unsupported(&term, "object"));
            };
            let literal = match term.language_tag() {
                Some(tag) => Literal::lang(value.to_string(), tag.as_str()),
                None => {
                    let Some(datatype) = term.datatype() else {
                        return Err(unsupported(&term, "datatype"));
                    };
                    Literal::typed(value.to_string(), datatype.as_str())
                }
            };
            Ok(Node::Literal(literal))
        }
        _ => Err(unsupported(&term, "object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sophia_api::source::TripleSource;
    use sophia_inmem::graph::LightGraph;

    fn parse(turtle: &str) -> Graph {
        let parsed: std::result::Result<LightGraph, _> =
            sophia_turtle::parser::turtle::parse_str(turtle).collect_triples();
        let converted = parsed
            .map_err(|e| e.to_string())
            .and_then(|g| Graph::from_sophia(&g).map_err(|e| e.to_string()));
        match converted {
            Ok(g) => g,
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn converts_every_term_kind() {
        let g = parse(
            r#"@prefix ex: <http://example.org/> .
               ex:a ex:p "plain", "tagged"@EN, 42, _:b .
               _:b ex:q ex:c ."#,
        );
        assert_eq!(g.len(), 5);
        let p = "http://example.org/p";
        let a = || Subject::named("http://example.org/a");
        assert!(g.contains(&Triple::new(a(), p, Literal::simple("plain"))));
        assert!(g.contains(&Triple::new(a(), p, Literal::lang("tagged", "en"))));
        assert!(g.contains(&Triple::new(
            a(),
            p,
            Literal::typed("42", "http://www.w3.org/2001/XMLSchema#integer"),
        )));
        assert_eq!(g.blank_nodes().len(), 1);
    }
}
