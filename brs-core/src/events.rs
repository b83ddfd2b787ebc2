//! # Fluxo de Eventos de um Registro
//!
//! Achata a árvore de um registro numa sequência linear, em ordem de documento:
//!
//! ```text
//! <r>Hello, <s l="word">beautiful <i>world</i></s>!</r>
//!
//! Text("Hello, ") SpanStart("word") Text("beautiful ") Text("world") SpanEnd Text("!")
//! ```
//!
//! A decoração some do fluxo: só seu texto aparece. Quem consome os eventos
//! (extrator de spans, decodificador) mantém um único contador de posição em
//! vez de espalhar contabilidade recursiva pela árvore.

use crate::document::{Node, Record};

/// Um evento do fluxo achatado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    Text(&'a str),
    SpanStart(&'a str),
    SpanEnd,
}

/// Iterador de eventos sobre os nós de um registro.
///
/// Usa uma pilha explícita de níveis, sem recursão.
pub struct Events<'a> {
    stack: Vec<Level<'a>>,
}

struct Level<'a> {
    nodes: std::slice::Iter<'a, Node>,
    /// Este nível é o conteúdo de um span: emite `SpanEnd` ao esgotar.
    closes_span: bool,
}

impl<'a> Events<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        Self {
            stack: vec![Level {
                nodes: nodes.iter(),
                closes_span: false,
            }],
        }
    }
}

impl<'a> Iterator for Events<'a> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        loop {
            let level = self.stack.last_mut()?;
            match level.nodes.next() {
                Some(Node::Text(text)) => return Some(Event::Text(text)),
                Some(Node::Span(span)) => {
                    self.stack.push(Level {
                        nodes: span.nodes.iter(),
                        closes_span: true,
                    });
                    return Some(Event::SpanStart(&span.label));
                }
                Some(Node::Markup(markup)) => {
                    self.stack.push(Level {
                        nodes: markup.nodes.iter(),
                        closes_span: false,
                    });
                }
                None => {
                    let done = self.stack.pop()?;
                    if done.closes_span {
                        return Some(Event::SpanEnd);
                    }
                }
            }
        }
    }
}

impl Record {
    /// Fluxo de eventos do registro.
    pub fn events(&self) -> Events<'_> {
        Events::new(&self.nodes)
    }
}
