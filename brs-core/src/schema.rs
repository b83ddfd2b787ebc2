//! # Esquema BRS — Namespace e Nomes Qualificados
//!
//! Um documento BRS é um XML restrito:
//!
//! ```text
//! <b xmlns="http://innodatalabs.com/brs">      documento
//!   <r>Texto <s l="rótulo">anotado</s>.</r>  registro com um span
//! </b>
//! ```
//!
//! | Elemento | Nome local | Papel                                   |
//! |----------|------------|-----------------------------------------|
//! | `b`      | document   | raiz, contém apenas registros           |
//! | `r`      | record     | texto corrido intercalado com spans     |
//! | `s`      | span       | trecho rotulado, atributo `l` obrigatório |
//!
//! Os nomes qualificados seguem a notação de Clark (`{namespace}local`).

/// URI do namespace BRS.
pub const BRS_NS: &str = "http://innodatalabs.com/brs";

/// Namespace reservado do prefixo `xml:` (ex: `xml:lang`).
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Nome local do elemento documento.
pub const DOCUMENT_TAG: &str = "b";
/// Nome local do elemento registro.
pub const RECORD_TAG: &str = "r";
/// Nome local do elemento span.
pub const SPAN_TAG: &str = "s";
/// Atributo que carrega o rótulo do span.
pub const LABEL_ATTR: &str = "l";

/// Nome qualificado do documento: `{http://innodatalabs.com/brs}b`.
pub const BRS_B: &str = "{http://innodatalabs.com/brs}b";
/// Nome qualificado do registro: `{http://innodatalabs.com/brs}r`.
pub const BRS_R: &str = "{http://innodatalabs.com/brs}r";
/// Nome qualificado do span: `{http://innodatalabs.com/brs}s`.
pub const BRS_S: &str = "{http://innodatalabs.com/brs}s";

/// Nome de elemento com namespace opcional.
///
/// Usado para os elementos de decoração (ex: `<i>`, `<div>`) que podem
/// aparecer dentro de registros e spans sem gerar spans próprios.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub namespace: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(namespace: Option<&str>, local: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            local: local.to_string(),
        }
    }

    /// Verdadeiro se o nome pertence ao namespace BRS.
    pub fn is_brs(&self) -> bool {
        self.namespace.as_deref() == Some(BRS_NS)
    }

    /// Notação de Clark: `{ns}local`, ou apenas `local` sem namespace.
    pub fn clark(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{{{}}}{}", ns, self.local),
            None => self.local.clone(),
        }
    }
}

impl std::fmt::Display for QName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.clark())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clark_constants_match_parts() {
        assert_eq!(QName::new(Some(BRS_NS), DOCUMENT_TAG).clark(), BRS_B);
        assert_eq!(QName::new(Some(BRS_NS), RECORD_TAG).clark(), BRS_R);
        assert_eq!(QName::new(Some(BRS_NS), SPAN_TAG).clark(), BRS_S);
    }

    #[test]
    fn test_qname_without_namespace() {
        let name = QName::new(None, "root");
        assert!(!name.is_brs());
        assert_eq!(name.to_string(), "root");
    }
}
