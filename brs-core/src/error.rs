//! Tipos de erro do crate.
//!
//! Três famílias de falha:
//! - **Contrato de entrada**: bytes curtos, sem `<`, UTF-8 inválido, XML malformado, esquema violado.
//! - **Estrutura**: documentos com número diferente de registros na avaliação.
//! - **Programação**: tokens e tags de tamanhos diferentes, tag IOB ilegível,
//!   texto com caracteres que o XML não representa.

use thiserror::Error;

/// Erros produzidos pelo motor de documentos, codificador e avaliador.
#[derive(Debug, Error)]
pub enum BrsError {
    #[error("invalid XML document (too short): {len} bytes")]
    TooShort { len: usize },

    #[error("data is expected to start with \"<\"")]
    MissingOpeningBracket,

    #[error("invalid UTF-8 in XML document: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("XML syntax error: {0}")]
    Syntax(#[from] roxmltree::Error),

    /// Mensagem no formato do validador XSD (libxml2), repassada sem alteração.
    #[error("{0}")]
    Schema(String),

    #[error("documents are not comparable: gold has {gold} records, test has {test}")]
    RecordCountMismatch { gold: usize, test: usize },

    #[error("token/label length mismatch: {tokens} tokens, {labels} labels")]
    LengthMismatch { tokens: usize, labels: usize },

    #[error("invalid IOB tag: {0:?}")]
    InvalidTag(String),

    /// Caractere fora do conjunto `Char` do XML 1.0 (ex: controles C0).
    #[error("character {ch:?} cannot be represented in XML 1.0")]
    UnrepresentableChar { ch: char },
}

/// Resultado padrão das operações BRS.
pub type BrsResult<T> = Result<T, BrsError>;
