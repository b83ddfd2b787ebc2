//! # Motor de Documentos BRS
//!
//! Converte bytes em uma árvore tipada e valida o esquema fixo:
//!
//! 1. **Pré-checagens**: tamanho mínimo e primeiro byte `<` (sem detecção de BOM).
//! 2. **Sintaxe**: UTF-8 + XML bem formado via `roxmltree`.
//! 3. **Esquema**: raiz `{BRS}b` contendo apenas `{BRS}r`; cada registro contém
//!    texto, spans `{BRS}s` com atributo `l` e marcação de decoração de outros
//!    namespaces. Spans não se aninham.
//!
//! ## Modelo
//!
//! ```text
//! BrsDocument
//! └── Record*
//!     └── Node = Text | Span | Markup
//!                      │      └── Node* (pode conter Spans)
//!                      └── Node* (apenas Text e Markup)
//! ```
//!
//! Os nós são variantes fechadas (`Node`), não elementos genéricos: quem percorre
//! a árvore decide por `match`, nunca inspecionando nomes de tag em tempo de execução.

use tracing::{debug, trace};

use crate::error::{BrsError, BrsResult};
use crate::schema::{QName, BRS_B, BRS_NS, BRS_R, BRS_S, DOCUMENT_TAG, LABEL_ATTR, RECORD_TAG, SPAN_TAG};

/// Tamanho mínimo (em bytes) para uma entrada ser considerada documento.
pub const MIN_DOCUMENT_LEN: usize = 4;

/// Documento BRS: sequência ordenada de registros.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BrsDocument {
    records: Vec<Record>,
}

impl BrsDocument {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Itera pelos registros em ordem de documento.
    pub fn records(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// Um registro: texto corrido intercalado com spans e decoração.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub nodes: Vec<Node>,
}

impl Record {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Texto renderizado do registro (todo o texto, em qualquer profundidade).
    ///
    /// É sobre esta string que os offsets dos spans são calculados.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.nodes, &mut out);
        out
    }

    /// Spans do registro em ordem de documento, inclusive os aninhados em decoração.
    pub fn spans(&self) -> Vec<&Span> {
        let mut out = Vec::new();
        collect_spans(&self.nodes, &mut out);
        out
    }
}

/// Conteúdo de um registro ou span.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Span(Span),
    Markup(Markup),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn span(label: impl Into<String>, text: impl Into<String>) -> Self {
        Node::Span(Span {
            label: label.into(),
            nodes: vec![Node::Text(text.into())],
        })
    }
}

/// Trecho rotulado. Nunca contém outro `Span`.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub label: String,
    pub nodes: Vec<Node>,
}

impl Span {
    /// Texto interno completo, incluindo o texto de elementos de decoração.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.nodes, &mut out);
        out
    }
}

/// Elemento de decoração (fora do namespace BRS). Contribui texto, não rótulos.
#[derive(Debug, Clone, PartialEq)]
pub struct Markup {
    pub name: QName,
    /// Atributos na ordem do documento, inclusive os com namespace (`xml:lang`).
    /// Declarações `xmlns` não entram aqui.
    pub attributes: Vec<(QName, String)>,
    pub nodes: Vec<Node>,
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Span(span) => collect_text(&span.nodes, out),
            Node::Markup(markup) => collect_text(&markup.nodes, out),
        }
    }
}

fn collect_spans<'a>(nodes: &'a [Node], out: &mut Vec<&'a Span>) {
    for node in nodes {
        match node {
            Node::Span(span) => out.push(span),
            Node::Markup(markup) => collect_spans(&markup.nodes, out),
            Node::Text(_) => {}
        }
    }
}

/// Faz o parse de um documento BRS completo (`<b>` com registros).
///
/// A entrada é sempre bytes; texto não é aceito:
///
/// ```compile_fail
/// brs_core::parse_brs("<a />");
/// ```
pub fn parse_brs(data: &[u8]) -> BrsResult<BrsDocument> {
    let text = precheck(data)?;
    let xml = roxmltree::Document::parse(text)?;
    let root = xml.root_element();

    if !is_brs(root, DOCUMENT_TAG) {
        return Err(no_global_declaration(root));
    }

    let mut records = Vec::new();
    for child in root.children() {
        if child.is_text() {
            if child.text().map_or(false, |t| !t.trim().is_empty()) {
                return Err(BrsError::Schema(format!(
                    "Element '{}': Character content other than whitespace is not allowed because the content type is 'element-only'.",
                    BRS_B
                )));
            }
        } else if child.is_element() {
            if !is_brs(child, RECORD_TAG) {
                return Err(BrsError::Schema(format!(
                    "Element '{}': This element is not expected. Expected is ( {} ).",
                    qname(child),
                    BRS_R
                )));
            }
            records.push(build_record(child)?);
            trace!("registro {} lido", records.len());
        }
    }

    debug!("documento BRS com {} registros", records.len());
    Ok(BrsDocument::new(records))
}

/// Faz o parse de um registro isolado (`<r xmlns="…">…</r>`).
pub fn parse_record(data: &[u8]) -> BrsResult<Record> {
    let text = precheck(data)?;
    let xml = roxmltree::Document::parse(text)?;
    let root = xml.root_element();

    if !is_brs(root, RECORD_TAG) {
        return Err(no_global_declaration(root));
    }
    build_record(root)
}

/// Checagens baratas antes de invocar o parser XML.
fn precheck(data: &[u8]) -> BrsResult<&str> {
    if data.len() < MIN_DOCUMENT_LEN {
        return Err(BrsError::TooShort { len: data.len() });
    }
    if data[0] != b'<' {
        return Err(BrsError::MissingOpeningBracket);
    }
    Ok(std::str::from_utf8(data)?)
}

fn is_brs(node: roxmltree::Node<'_, '_>, local: &str) -> bool {
    node.tag_name().namespace() == Some(BRS_NS) && node.tag_name().name() == local
}

fn qname(node: roxmltree::Node<'_, '_>) -> QName {
    QName::new(node.tag_name().namespace(), node.tag_name().name())
}

fn no_global_declaration(node: roxmltree::Node<'_, '_>) -> BrsError {
    BrsError::Schema(format!(
        "Element '{}': No matching global declaration available for the validation root.",
        qname(node)
    ))
}

fn build_record(node: roxmltree::Node<'_, '_>) -> BrsResult<Record> {
    Ok(Record::new(build_nodes(node, false)?))
}

/// Constrói os filhos de `parent`. `in_span` proíbe spans aninhados.
fn build_nodes(parent: roxmltree::Node<'_, '_>, in_span: bool) -> BrsResult<Vec<Node>> {
    let mut nodes = Vec::new();

    for child in parent.children() {
        if child.is_text() {
            if let Some(text) = child.text() {
                push_text(&mut nodes, text);
            }
            continue;
        }
        if !child.is_element() {
            // comentários e instruções de processamento
            continue;
        }

        let name = qname(child);
        if name.is_brs() {
            if name.local != SPAN_TAG || in_span {
                return Err(BrsError::Schema(format!(
                    "Element '{}': This element is not expected.",
                    name
                )));
            }
            let label = child.attribute(LABEL_ATTR).ok_or_else(|| {
                BrsError::Schema(format!(
                    "Element '{}': The attribute '{}' is required but missing.",
                    BRS_S, LABEL_ATTR
                ))
            })?;
            nodes.push(Node::Span(Span {
                label: label.to_string(),
                nodes: build_nodes(child, true)?,
            }));
        } else {
            let attributes = child
                .attributes()
                .map(|a| (QName::new(a.namespace(), a.name()), a.value().to_string()))
                .collect();
            nodes.push(Node::Markup(Markup {
                name,
                attributes,
                nodes: build_nodes(child, in_span)?,
            }));
        }
    }

    Ok(nodes)
}

/// Junta texto adjacente (separado apenas por comentários removidos).
fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if let Some(Node::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(Node::Text(text.to_string()));
    }
}
