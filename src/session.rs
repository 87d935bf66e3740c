//! Interactive session over stdio
//!
//! Line-delimited JSON: each input line is a request
//! `{"id": .., "method": .., "params": {..}}` and each output line the
//! matching response. The session owns the search index, the recent
//! selection history and the delayed reveal of the selected record.

use crate::cli::{ClassifyArgs, ExportArgs, SearchArgs, ShowArgs};
use crate::config::Config;
use crate::error::{normalize_text, validate_query, AppError};
use crate::feedback::{emit, Cue, Feedback};
use crate::memo::Memo;
use crate::recent::RecentTargets;
use crate::reveal::RevealScheduler;
use crate::search::index::MIN_QUERY_CHARS;
use crate::search::{SearchIndex, SearchResult};
use crate::store::{RecordId, RecordStore};
use crate::tools::export::execute_export;
use crate::tools::search::SearchOutput;
use crate::tools::show::{associate_entries, execute_show, lookup};
use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader as AsyncBufReader};
use tracing::{debug, error, info};

/// Session request structure
#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

/// Session response structure
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SessionError>,
}

/// Session error structure
#[derive(Debug, Serialize)]
pub struct SessionError {
    pub code: String,
    pub message: String,
}

impl SessionResponse {
    /// Create a successful response
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Option<Value>, code: &str, message: &str) -> Self {
        Self {
            id,
            result: None,
            error: Some(SessionError {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }
}

/// Parameters naming a single record, defaulting to the selected one
#[derive(Debug, Default, Deserialize)]
struct RecordParams {
    id: Option<RecordId>,
}

/// Parse request parameters, treating absent params as an empty object
fn parse_params<T: for<'de> Deserialize<'de>>(params: Option<Value>) -> Result<T, AppError> {
    let params = params.unwrap_or_else(|| json!({}));
    serde_json::from_value(params)
        .map_err(|e| AppError::InvalidInput(format!("Invalid parameters: {}", e)))
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.to_string()))
}

pub struct Session {
    store: Arc<RecordStore>,
    index: SearchIndex,
    recent: RecentTargets,
    reveal: RevealScheduler,
    search_memo: Memo<String, Vec<SearchResult>>,
    export_dir: PathBuf,
    feedback: Feedback,
}

impl Session {
    pub fn new(store: Arc<RecordStore>, config: &Config, feedback: Feedback) -> Self {
        let index = SearchIndex::with_matcher(Arc::clone(&store), config.matcher.build());
        Self {
            store,
            index,
            recent: RecentTargets::new(),
            reveal: RevealScheduler::new(config.reveal_delay(), feedback.clone()),
            search_memo: Memo::new(),
            export_dir: config.export_dir.clone(),
            feedback,
        }
    }

    /// Handle a single request. Must run inside a tokio runtime.
    pub fn handle_request(&mut self, request: SessionRequest) -> SessionResponse {
        debug!("Handling session method {}", request.method);

        match self.dispatch(&request.method, request.params) {
            Ok(result) => SessionResponse::success(request.id, result),
            Err(e) => SessionResponse::error(request.id, e.error_code(), &e.message()),
        }
    }

    fn dispatch(&mut self, method: &str, params: Option<Value>) -> Result<Value, AppError> {
        match method {
            "initialize" => Ok(self.initialize()),
            "search" => self.search(parse_params(params)?),
            "select" => self.select(parse_params(params)?),
            "status" => Ok(self.status()),
            "associates" => self.associates(parse_params(params)?),
            "recent" => to_value(&self.recent.entries()),
            "forget" => self.forget(parse_params(params)?),
            "record" => self.record(parse_params(params)?),
            "export" => self.export(parse_params(params)?),
            "classify" => {
                let args: ClassifyArgs = parse_params(params)?;
                to_value(&crate::tools::classify::execute_classify(&args))
            }
            _ => Err(AppError::InvalidInput(format!(
                "Method '{}' not found",
                method
            ))),
        }
    }

    fn initialize(&self) -> Value {
        use schemars::schema_for;

        json!({
            "serverInfo": {
                "name": "intel-core",
                "version": env!("CARGO_PKG_VERSION"),
            },
            "records": self.store.len(),
            "methods": [
                { "name": "search", "inputSchema": schema_for!(SearchArgs) },
                { "name": "select", "inputSchema": schema_for!(ShowArgs) },
                { "name": "status" },
                { "name": "associates" },
                { "name": "recent" },
                { "name": "forget", "inputSchema": schema_for!(ShowArgs) },
                { "name": "record" },
                { "name": "export", "inputSchema": schema_for!(ExportArgs) },
                { "name": "classify", "inputSchema": schema_for!(ClassifyArgs) },
            ]
        })
    }

    /// A new query drops the revealed selection, like typing into the search box
    fn search(&mut self, args: SearchArgs) -> Result<Value, AppError> {
        validate_query(&args.query)?;
        emit(&self.feedback, Cue::Tick);
        self.reveal.clear();

        let key = normalize_text(&args.query);
        let version = self.store.version();
        let index = &mut self.index;
        let mut results = self
            .search_memo
            .get_or_compute(key.clone(), version, |query| index.search(query));
        if let Some(limit) = args.limit {
            results.truncate(limit);
        }

        let output = SearchOutput::from_results(&self.store, &args.query, results);
        let mut value = to_value(&output)?;
        if key.chars().count() < MIN_QUERY_CHARS {
            value["recent"] = to_value(&self.recent.entries())?;
        }
        Ok(value)
    }

    fn select(&mut self, args: ShowArgs) -> Result<Value, AppError> {
        let name = lookup(&self.store, args.id)?.name().to_string();
        emit(&self.feedback, Cue::Scan);

        self.recent.select(args.id, &name, Utc::now());
        self.reveal.schedule(args.id);
        info!("Selected record {}", args.id);

        Ok(json!({
            "id": args.id,
            "scanning": true,
            "recent": to_value(&self.recent.entries())?,
        }))
    }

    fn status(&self) -> Value {
        let selected = self.reveal.selected();
        json!({
            "selected": selected,
            "name": selected.and_then(|id| self.store.get(id)).map(|r| r.name()),
            "scanning": self.reveal.is_scanning(),
        })
    }

    fn target(&self, params: RecordParams) -> Result<RecordId, AppError> {
        params
            .id
            .or_else(|| self.reveal.selected())
            .ok_or_else(|| AppError::InvalidInput("No record selected".to_string()))
    }

    fn associates(&self, params: RecordParams) -> Result<Value, AppError> {
        let id = self.target(params)?;
        let record = lookup(&self.store, id)?;
        to_value(&associate_entries(&self.store, record, id))
    }

    fn forget(&mut self, args: ShowArgs) -> Result<Value, AppError> {
        let entries = self.recent.remove(args.id);
        let value = to_value(&entries)?;
        emit(&self.feedback, Cue::Error);
        Ok(value)
    }

    fn record(&self, params: RecordParams) -> Result<Value, AppError> {
        let id = self.target(params)?;
        to_value(&execute_show(&self.store, id)?)
    }

    /// Export the given or selected record; nothing selected is a no-op
    fn export(&self, args: ExportArgs) -> Result<Value, AppError> {
        let Some(id) = args.id.or_else(|| self.reveal.selected()) else {
            debug!("Export requested with no record selected");
            return Ok(json!({ "exported": false }));
        };

        let dir = args.dir.unwrap_or_else(|| self.export_dir.clone());
        let output = execute_export(&self.store, id, &dir, Utc::now())?;
        emit(&self.feedback, Cue::Match);

        Ok(json!({
            "exported": true,
            "id": output.id,
            "path": output.path,
        }))
    }
}

/// Parse session request from JSON string
pub fn parse_request(json: &str) -> Result<SessionRequest> {
    let request: SessionRequest = serde_json::from_str(json)?;
    Ok(request)
}

/// Serialize session response to JSON string
pub fn serialize_response(response: &SessionResponse) -> Result<String> {
    Ok(serde_json::to_string(response)?)
}

/// Run the session on stdio until input closes
pub async fn handle_stdio(mut session: Session) -> Result<()> {
    info!("Starting intel-core session on stdio");
    emit(&session.feedback, Cue::Boot);

    let stdin = tokio::io::stdin();
    let mut reader = AsyncBufReader::new(stdin).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = reader.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        debug!("Received request: {}", line);

        let response = match parse_request(&line) {
            Ok(request) => session.handle_request(request),
            Err(e) => {
                error!("Failed to parse request: {}", e);
                SessionResponse::error(None, "parse_error", &format!("Invalid JSON: {}", e))
            }
        };

        let response_json = serialize_response(&response)?;
        debug!("Sending response: {}", response_json);

        stdout.write_all(response_json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}
