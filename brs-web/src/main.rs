//! Servidor web Axum expondo codificação, decodificação e avaliação de documentos BRS

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use brs_core::{
    decode_document, encode_record, evaluate_records, format_labels, parse_brs, parse_labels,
    record_to_set, write_record, BrsError, Evaluation, NamespacePrefix, SpanEntry, TokenizerMode,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Configuração lida do ambiente
#[derive(Debug, Clone)]
struct WebConfig {
    /// `BRS_WEB_ADDR`, padrão `0.0.0.0:3000`
    addr: SocketAddr,
    /// `BRS_WEB_MAX_BODY` em bytes, padrão 10 MiB
    max_body: usize,
    /// `BRS_WEB_PREFIX`: prefixo do namespace no XML gerado (vazio = namespace padrão)
    prefix: NamespacePrefix,
}

impl WebConfig {
    fn from_env() -> Result<Self, String> {
        let addr = std::env::var("BRS_WEB_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .map_err(|e| format!("BRS_WEB_ADDR inválido: {e}"))?;
        let max_body = match std::env::var("BRS_WEB_MAX_BODY") {
            Ok(v) => v
                .parse()
                .map_err(|e| format!("BRS_WEB_MAX_BODY inválido: {e}"))?,
            Err(_) => 10 * 1024 * 1024,
        };
        let prefix = match std::env::var("BRS_WEB_PREFIX") {
            Ok(p) if !p.is_empty() => NamespacePrefix::Prefixed(p),
            _ => NamespacePrefix::Default,
        };
        Ok(Self { addr, max_body, prefix })
    }
}

/// Estado compartilhado da aplicação
struct AppState {
    prefix: NamespacePrefix,
}

#[derive(Deserialize)]
struct EncodeRequest {
    tokens: Vec<String>,
    labels: Vec<String>,
    /// Sobrepõe o prefixo configurado para esta chamada
    #[serde(default)]
    prefix: Option<String>,
}

#[derive(Serialize)]
struct EncodeResponse {
    xml: String,
    text: String,
}

#[derive(Deserialize)]
struct DocumentRequest {
    xml: String,
    #[serde(default)]
    tokenizer_mode: Option<TokenizerMode>,
}

#[derive(Serialize)]
struct DecodedRecord {
    tokens: Vec<String>,
    labels: Vec<String>,
}

#[derive(Serialize)]
struct SpansResponse {
    records: Vec<Vec<SpanEntry>>,
}

#[derive(Deserialize)]
struct EvaluateRequest {
    gold: String,
    test: String,
}

#[derive(Serialize)]
struct EvaluateResponse {
    #[serde(flatten)]
    total: Evaluation,
    precision: f64,
    recall: f64,
    f1: f64,
    records: Vec<Evaluation>,
}

/// Erros da API: entrada inválida → 400, falha interna → 500; corpo `{"error": "..."}`
enum ApiError {
    BadRequest(BrsError),
    Internal(String),
}

impl From<BrsError> for ApiError {
    fn from(err: BrsError) -> Self {
        ApiError::BadRequest(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(err) => {
                warn!("requisição rejeitada: {}", err);
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Internal(message) => {
                tracing::error!("erro interno: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match WebConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(2);
        }
    };

    let app = app(&config);

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("não foi possível abrir {}: {e}", config.addr);
            std::process::exit(1);
        }
    };
    info!("🚀 Servidor BRS iniciado em http://{}", config.addr);
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("servidor encerrado com erro: {e}");
    }
}

fn app(config: &WebConfig) -> Router {
    let state = Arc::new(AppState {
        prefix: config.prefix.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/encode", post(encode_handler))
        .route("/decode", post(decode_handler))
        .route("/spans", post(spans_handler))
        .route("/evaluate", post(evaluate_handler))
        .layer(DefaultBodyLimit::max(config.max_body))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Tokens + tags IOB → registro XML
async fn encode_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EncodeRequest>,
) -> Result<Json<EncodeResponse>, ApiError> {
    let tags = parse_labels(&req.labels)?;
    let record = encode_record(&req.tokens, &tags)?;
    let prefix = match req.prefix {
        Some(p) if !p.is_empty() => NamespacePrefix::Prefixed(p),
        Some(_) => NamespacePrefix::Default,
        None => state.prefix.clone(),
    };

    Ok(Json(EncodeResponse {
        xml: write_record(&record, &prefix)?,
        text: record.text(),
    }))
}

/// Documento XML → tokens + tags IOB por registro
async fn decode_handler(Json(req): Json<DocumentRequest>) -> Result<Json<Vec<DecodedRecord>>, ApiError> {
    let doc = parse_brs(req.xml.as_bytes())?;
    let mode = req.tokenizer_mode.unwrap_or_default();
    info!("decodificando {} registros [{:?}]", doc.len(), mode);

    let records = decode_document(&doc, &mode)
        .into_iter()
        .map(|(tokens, tags)| DecodedRecord {
            tokens,
            labels: format_labels(&tags),
        })
        .collect();
    Ok(Json(records))
}

/// Documento XML → conjunto de spans por registro
async fn spans_handler(Json(req): Json<DocumentRequest>) -> Result<Json<SpansResponse>, ApiError> {
    let doc = parse_brs(req.xml.as_bytes())?;
    let records = doc
        .records()
        .map(|r| record_to_set(r).into_iter().collect())
        .collect();
    Ok(Json(SpansResponse { records }))
}

/// Gold × test → contagens agregadas e por registro
async fn evaluate_handler(Json(req): Json<EvaluateRequest>) -> Result<Json<EvaluateResponse>, ApiError> {
    // parse + avaliação (Rayon) fora do runtime async
    let outcome = tokio::task::spawn_blocking(move || -> Result<Vec<Evaluation>, BrsError> {
        let gold = parse_brs(req.gold.as_bytes())?;
        let test = parse_brs(req.test.as_bytes())?;
        evaluate_records(&gold, &test)
    })
    .await;

    let records = outcome.map_err(|e| ApiError::Internal(format!("evaluation task failed: {e}")))??;
    let total: Evaluation = records.iter().copied().sum();
    info!(
        "avaliação: gold={} tp={} fp={} fn={}",
        total.gold_tag_count, total.true_positives, total.false_positives, total.false_negatives
    );

    Ok(Json(EvaluateResponse {
        total,
        precision: total.precision(),
        recall: total.recall(),
        f1: total.f1(),
        records,
    }))
}
