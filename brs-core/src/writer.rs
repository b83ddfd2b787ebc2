//! # Serialização BRS
//!
//! Renderiza registros e documentos de volta para XML. O namespace BRS é
//! declarado uma única vez no elemento mais externo, como prefixo padrão
//! (`xmlns="…"`) ou nomeado (`xmlns:i="…"`), conforme [`NamespacePrefix`].
//!
//! Elementos de decoração são escritos sem prefixo; quando o namespace padrão
//! em vigor difere do deles, o writer redeclara `xmlns` no próprio elemento.
//! Atributos de decoração com namespace ganham prefixos locais (`a0`, `a1`, …),
//! exceto `xml:`, que é predeclarado.
//!
//! `\r` sai como `&#13;` para sobreviver à normalização de fim de linha do parser.

use tracing::trace;

use crate::document::{BrsDocument, Markup, Node, Record};
use crate::error::{BrsError, BrsResult};
use crate::schema::{BRS_NS, DOCUMENT_TAG, LABEL_ATTR, RECORD_TAG, SPAN_TAG, XML_NS};

/// Como o namespace BRS aparece no XML gerado.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NamespacePrefix {
    /// `<r xmlns="http://innodatalabs.com/brs">`
    #[default]
    Default,
    /// `<i:r xmlns:i="http://innodatalabs.com/brs">`
    Prefixed(String),
}

impl NamespacePrefix {
    fn tag(&self, local: &str) -> String {
        match self {
            NamespacePrefix::Default => local.to_string(),
            NamespacePrefix::Prefixed(p) => format!("{}:{}", p, local),
        }
    }

    fn declaration(&self) -> String {
        match self {
            NamespacePrefix::Default => format!(" xmlns=\"{}\"", BRS_NS),
            NamespacePrefix::Prefixed(p) => format!(" xmlns:{}=\"{}\"", p, BRS_NS),
        }
    }

    /// Namespace padrão em vigor logo após a declaração.
    fn default_ns(&self) -> Option<&'static str> {
        match self {
            NamespacePrefix::Default => Some(BRS_NS),
            NamespacePrefix::Prefixed(_) => None,
        }
    }
}

/// Serializa um único registro como fragmento autônomo.
///
/// Falha se algum texto, rótulo ou atributo contém caractere que o XML 1.0
/// não representa (controles C0 exceto tab/LF/CR, `U+FFFE`, `U+FFFF`).
///
/// ```
/// use brs_core::{write_record, NamespacePrefix, Node, Record};
///
/// let record = Record::new(vec![Node::text("Olá, "), Node::span("word", "mundo")]);
/// assert_eq!(
///     write_record(&record, &NamespacePrefix::Default).unwrap(),
///     r#"<r xmlns="http://innodatalabs.com/brs">Olá, <s l="word">mundo</s></r>"#
/// );
/// ```
pub fn write_record(record: &Record, prefix: &NamespacePrefix) -> BrsResult<String> {
    let mut out = String::new();
    let mut writer = Writer { out: &mut out, prefix };
    writer.record(record, true)?;
    Ok(out)
}

/// Serializa um documento completo, um registro por linha.
pub fn write_document(doc: &BrsDocument, prefix: &NamespacePrefix) -> BrsResult<String> {
    let mut out = String::new();
    let mut writer = Writer { out: &mut out, prefix };

    let root = prefix.tag(DOCUMENT_TAG);
    writer.out.push('<');
    writer.out.push_str(&root);
    writer.out.push_str(&prefix.declaration());
    writer.out.push('>');
    for record in doc.records() {
        writer.out.push('\n');
        writer.record(record, false)?;
    }
    writer.out.push_str("\n</");
    writer.out.push_str(&root);
    writer.out.push('>');

    trace!("documento serializado: {} bytes", out.len());
    Ok(out)
}

struct Writer<'a> {
    out: &'a mut String,
    prefix: &'a NamespacePrefix,
}

impl Writer<'_> {
    fn record(&mut self, record: &Record, declare: bool) -> BrsResult<()> {
        let tag = self.prefix.tag(RECORD_TAG);
        self.out.push('<');
        self.out.push_str(&tag);
        if declare {
            self.out.push_str(&self.prefix.declaration());
        }
        self.out.push('>');
        self.nodes(&record.nodes, self.prefix.default_ns())?;
        self.close(&tag);
        Ok(())
    }

    fn nodes(&mut self, nodes: &[Node], default_ns: Option<&str>) -> BrsResult<()> {
        for node in nodes {
            match node {
                Node::Text(text) => escape_into(self.out, text, false)?,
                Node::Span(span) => {
                    let tag = self.prefix.tag(SPAN_TAG);
                    // um span sem prefixo dentro de decoração precisa do namespace padrão BRS
                    let redeclare = matches!(self.prefix, NamespacePrefix::Default)
                        && default_ns != Some(BRS_NS);
                    self.out.push('<');
                    self.out.push_str(&tag);
                    if redeclare {
                        self.out.push_str(&self.prefix.declaration());
                    }
                    self.out.push(' ');
                    self.out.push_str(LABEL_ATTR);
                    self.out.push_str("=\"");
                    escape_into(self.out, &span.label, true)?;
                    self.out.push_str("\">");
                    let inner = if redeclare { Some(BRS_NS) } else { default_ns };
                    self.nodes(&span.nodes, inner)?;
                    self.close(&tag);
                }
                Node::Markup(markup) => self.markup(markup, default_ns)?,
            }
        }
        Ok(())
    }

    fn markup(&mut self, markup: &Markup, default_ns: Option<&str>) -> BrsResult<()> {
        let own_ns = markup.name.namespace.as_deref();
        self.out.push('<');
        self.out.push_str(&markup.name.local);
        if own_ns != default_ns {
            self.out.push_str(" xmlns=\"");
            escape_into(self.out, own_ns.unwrap_or(""), true)?;
            self.out.push('"');
        }

        // prefixos locais para atributos com namespace (`xml:` já é predeclarado)
        let mut declared: Vec<(&str, String)> = Vec::new();
        for (name, value) in &markup.attributes {
            self.out.push(' ');
            match name.namespace.as_deref() {
                None => {}
                Some(XML_NS) => self.out.push_str("xml:"),
                Some(ns) => {
                    let prefix = match declared.iter().find(|(d, _)| *d == ns) {
                        Some((_, p)) => p.clone(),
                        None => {
                            let p = self.attribute_prefix(declared.len());
                            self.out.push_str("xmlns:");
                            self.out.push_str(&p);
                            self.out.push_str("=\"");
                            escape_into(self.out, ns, true)?;
                            self.out.push_str("\" ");
                            declared.push((ns, p.clone()));
                            p
                        }
                    };
                    self.out.push_str(&prefix);
                    self.out.push(':');
                }
            }
            self.out.push_str(&name.local);
            self.out.push_str("=\"");
            escape_into(self.out, value, true)?;
            self.out.push('"');
        }
        self.out.push('>');
        self.nodes(&markup.nodes, own_ns)?;
        self.close(&markup.name.local);
        Ok(())
    }

    /// Prefixo `aN` que não colide com o prefixo BRS em uso.
    fn attribute_prefix(&self, index: usize) -> String {
        let candidate = format!("a{}", index);
        match self.prefix {
            NamespacePrefix::Prefixed(p) if *p == candidate => format!("a{}_", index),
            _ => candidate,
        }
    }

    fn close(&mut self, tag: &str) {
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }
}

/// Caracteres aceitos pela produção `Char` do XML 1.0.
fn is_xml_char(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

fn escape_into(out: &mut String, text: &str, attribute: bool) -> BrsResult<()> {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            // o parser normaliza CR literal para LF
            '\r' => out.push_str("&#13;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\t' if attribute => out.push_str("&#9;"),
            _ if !is_xml_char(ch) => return Err(BrsError::UnrepresentableChar { ch }),
            _ => out.push(ch),
        }
    }
    Ok(())
}
