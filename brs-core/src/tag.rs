//! # Esquema de Tags IOB
//!
//! Cada token recebe exatamente uma tag:
//!
//! - `B-<rótulo>`: Begin — primeiro token de um span
//! - `I-<rótulo>`: Inside — tokens seguintes do mesmo span
//! - `O`: Outside — texto fora de qualquer span
//!
//! Diferente de um NER com categorias fixas, os rótulos BRS são strings livres
//! (`"au"`, `"year"`, `"title"`...), definidas pelo atributo `l` do documento.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BrsError, BrsResult};

/// Tag IOB aplicada a um token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IobTag {
    /// **Begin**: abre um span. Ex: **beautiful** (B-word) world.
    Begin(String),
    /// **Inside**: continua o span aberto. Ex: beautiful **world** (I-word).
    Inside(String),
    /// **Outside**: o token não pertence a nenhum span.
    Outside,
}

impl IobTag {
    pub fn begin(label: impl Into<String>) -> Self {
        IobTag::Begin(label.into())
    }

    pub fn inside(label: impl Into<String>) -> Self {
        IobTag::Inside(label.into())
    }

    /// Representação textual da tag (ex: "B-au", "I-au", "O")
    pub fn label(&self) -> String {
        match self {
            IobTag::Begin(l) => format!("B-{}", l),
            IobTag::Inside(l) => format!("I-{}", l),
            IobTag::Outside => "O".to_string(),
        }
    }

    /// Rótulo do span (se for B- ou I-)
    pub fn category(&self) -> Option<&str> {
        match self {
            IobTag::Begin(l) | IobTag::Inside(l) => Some(l),
            IobTag::Outside => None,
        }
    }

    /// Parseia uma tag a partir de string (ex: "B-refno" → Begin("refno")).
    ///
    /// O rótulo pode conter hífens: só o primeiro separa o prefixo.
    pub fn from_label(s: &str) -> Option<Self> {
        if s == "O" {
            return Some(IobTag::Outside);
        }
        let (prefix, label) = s.split_once('-')?;
        if label.is_empty() {
            return None;
        }
        match prefix {
            "B" => Some(IobTag::Begin(label.to_string())),
            "I" => Some(IobTag::Inside(label.to_string())),
            _ => None,
        }
    }

    /// Verifica se a transição `prev → next` é válida no esquema IOB.
    ///
    /// `I-X` só pode seguir `B-X` ou `I-X`; qualquer outra tag pode seguir qualquer uma.
    pub fn is_valid_transition(prev: Option<&IobTag>, next: &IobTag) -> bool {
        match next {
            IobTag::Inside(label) => match prev {
                Some(IobTag::Begin(p)) | Some(IobTag::Inside(p)) => p == label,
                _ => false,
            },
            _ => true,
        }
    }
}

impl std::fmt::Display for IobTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for IobTag {
    type Err = BrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IobTag::from_label(s).ok_or_else(|| BrsError::InvalidTag(s.to_string()))
    }
}

impl TryFrom<String> for IobTag {
    type Error = BrsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<IobTag> for String {
    fn from(tag: IobTag) -> Self {
        tag.label()
    }
}

/// Converte uma lista de strings (`"O"`, `"B-x"`, `"I-x"`) em tags.
pub fn parse_labels<S: AsRef<str>>(labels: &[S]) -> BrsResult<Vec<IobTag>> {
    labels.iter().map(|l| l.as_ref().parse()).collect()
}

/// Converte tags de volta para strings.
pub fn format_labels(tags: &[IobTag]) -> Vec<String> {
    tags.iter().map(IobTag::label).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_labels() {
        assert_eq!(IobTag::Outside.label(), "O");
        assert_eq!(IobTag::begin("word").label(), "B-word");
        assert_eq!(IobTag::inside("word").to_string(), "I-word");
    }

    #[test]
    fn test_tag_from_label() {
        assert_eq!(IobTag::from_label("O"), Some(IobTag::Outside));
        assert_eq!(IobTag::from_label("B-au"), Some(IobTag::begin("au")));
        assert_eq!(IobTag::from_label("I-date-range"), Some(IobTag::inside("date-range")));
        assert_eq!(IobTag::from_label("B-"), None);
        assert_eq!(IobTag::from_label("E-au"), None);
        assert_eq!(IobTag::from_label("o"), None);
    }

    #[test]
    fn test_parse_labels_reports_bad_tag() {
        let err = parse_labels(&["O", "X-y"]).unwrap_err();
        assert!(matches!(err, BrsError::InvalidTag(ref s) if s == "X-y"));
    }

    #[test]
    fn test_valid_transitions() {
        let b = IobTag::begin("au");
        assert!(IobTag::is_valid_transition(Some(&b), &IobTag::inside("au")));
        assert!(!IobTag::is_valid_transition(Some(&IobTag::Outside), &IobTag::inside("au")));
        assert!(!IobTag::is_valid_transition(Some(&b), &IobTag::inside("year")));
        assert!(!IobTag::is_valid_transition(None, &IobTag::inside("au")));
        assert!(IobTag::is_valid_transition(None, &b));
    }

    #[test]
    fn test_serde_uses_string_form() {
        let json = serde_json::to_string(&vec![IobTag::begin("x"), IobTag::Outside]).unwrap();
        assert_eq!(json, r#"["B-x","O"]"#);
        let back: Vec<IobTag> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![IobTag::begin("x"), IobTag::Outside]);
        assert!(serde_json::from_str::<IobTag>(r#""Z""#).is_err());
    }
}
